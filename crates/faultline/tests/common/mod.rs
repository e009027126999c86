#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use faultline::config::{Config, UserConfig};
use faultline::{AppState, create_router, with_error_handling};
use serde_json::Value;
use tower::ServiceExt;

pub const ALICE: (&str, &str) = ("alice", "wonderland");
pub const ROOT: (&str, &str) = ("root", "hunter2");

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.security.users = vec![
        UserConfig {
            name: ALICE.0.to_string(),
            password: ALICE.1.to_string(),
            roles: vec!["USER".to_string()],
        },
        UserConfig {
            name: ROOT.0.to_string(),
            password: ROOT.1.to_string(),
            roles: vec!["USER".to_string(), "ADMIN".to_string()],
        },
    ];
    config
}

/// The daemon router as served in production
pub fn app() -> Router {
    create_router(Arc::new(AppState::new(test_config())))
}

/// Extra routes wrapped in the production security and error layers
pub fn app_with(routes: Router) -> Router {
    with_error_handling(routes, &AppState::new(test_config()))
}

pub fn basic(credentials: (&str, &str)) -> String {
    let token = STANDARD.encode(format!("{}:{}", credentials.0, credentials.1));
    format!("Basic {token}")
}

pub fn get(uri: &str, credentials: Option<(&str, &str)>) -> Request<Body> {
    request("GET", uri, credentials)
}

/// Bodyless request with any method
pub fn request(method: &str, uri: &str, credentials: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(credentials) = credentials {
        builder = builder.header(AUTHORIZATION, basic(credentials));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, credentials: Option<(&str, &str)>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(credentials) = credentials {
        builder = builder.header(AUTHORIZATION, basic(credentials));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

/// Send and decode the error body
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content type: {content_type}"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn send_text(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = send(app, request).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Assert the fields every error body carries
pub fn assert_contract(body: &Value, status: u16, code: &str, path: &str) {
    assert_eq!(body["status"], status);
    assert_eq!(body["code"], code);
    assert_eq!(body["path"], path);
    assert!(body["timestamp"].is_string());
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert_eq!(body["errorId"].as_str().unwrap().len(), 36);
}
