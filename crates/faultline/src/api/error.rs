//! API error boundary
//!
//! Handlers fail with [`AppError`]. Turning an `AppError` into a response
//! only parks the failure in the response extensions; [`error_boundary`],
//! the outermost middleware, knows the request path and resolves it through
//! the [`ErrorMapper`]. Every error body leaves the daemon through
//! [`render`], including the ones built by the security adapters.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use faultline_core::{ErrorMapper, Failure, Resolution};
use uuid::Uuid;

/// Content type of every error body
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Written when an error body cannot be serialized, `{error_id}` is the id
/// of the failed body so client and log line still correlate
const FALLBACK_BODY: &str = r#"{"status":500,"code":"INTERNAL_ERROR","message":"something went wrong, try again later","errorId":"{error_id}"}"#;

/// Handler error carrying an unresolved [`Failure`]
#[derive(Debug)]
pub struct AppError(pub Failure);

impl AppError {
    pub fn failure(&self) -> &Failure {
        &self.0
    }
}

impl<E> From<E> for AppError
where
    E: Into<Failure>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

#[derive(Clone)]
struct PendingFailure(Arc<Failure>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(PendingFailure(Arc::new(self.0)));
        response
    }
}

/// Outermost middleware resolving failures raised further down
pub async fn error_boundary(
    State(mapper): State<ErrorMapper>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<PendingFailure>() {
        Some(PendingFailure(failure)) => render(mapper.resolve(&failure, &path)),
        None => response,
    }
}

/// Serialize a resolution as the HTTP response
pub fn render(resolution: Resolution) -> Response {
    match serde_json::to_vec(&resolution.body) {
        Ok(body) => (
            resolution.status,
            [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON_UTF8))],
            body,
        )
            .into_response(),
        Err(e) => {
            let error_id = resolution.body.error_id();
            tracing::error!(error = %e, %error_id, "failed to serialize error body");
            fallback(error_id)
        }
    }
}

fn fallback(error_id: Uuid) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON_UTF8))],
        FALLBACK_BODY.replace("{error_id}", &error_id.to_string()),
    )
        .into_response()
}

/// Panic handler for `CatchPanicLayer`, the panic becomes an unclassified failure
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError(Failure::internal(format!("handler panicked: {detail}"))).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use faultline_api::{ApiError, ErrorCode};
    use faultline_core::NotFound;

    use super::*;

    #[tokio::test]
    async fn test_render_sets_status_and_content_type() {
        let resolution = ErrorMapper::default().resolve(&Failure::NotFound(None), "/things/1");
        let error_id = resolution.body.error_id();
        let response = render(resolution);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            APPLICATION_JSON_UTF8
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code(), ErrorCode::NotFound);
        assert_eq!(body.error_id(), error_id);
    }

    #[test]
    fn test_app_error_parks_failure() {
        let response = AppError::from(NotFound("gone".to_string())).into_response();
        assert!(response.extensions().get::<PendingFailure>().is_some());
    }

    #[tokio::test]
    async fn test_fallback_body_carries_error_id() {
        let error_id = Uuid::new_v4();
        let response = fallback(error_id);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            APPLICATION_JSON_UTF8
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["status"], 500);
        assert_eq!(json["errorId"], error_id.to_string());
    }

    #[test]
    fn test_panic_payload_is_kept() {
        let response = handle_panic(Box::new("kaboom"));
        let PendingFailure(failure) = response.extensions().get::<PendingFailure>().unwrap().clone();
        assert!(failure.to_string().contains("handler panicked: kaboom"));
    }
}
