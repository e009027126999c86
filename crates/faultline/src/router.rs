//! HTTP router configuration

use std::sync::Arc;

use axum::{Router, http::Method, middleware, routing::get};
use faultline_core::{Failure, IllegalArgument};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::error::{AppError, error_boundary, handle_panic};
use crate::api::{probe, system};
use crate::docs::{self, ApiDoc};
use crate::security;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        // System endpoints
        .route("/health", get(system::health))
        // Probes
        .route("/ping", get(probe::ping))
        .route("/admin/ping", get(probe::admin_ping))
        // Documentation
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()));

    with_error_handling(routes, &state)
}

/// Wrap `routes` in the security and error boundary layers
///
/// Innermost first: panic catcher, access policy, error boundary, request
/// tracing. Unknown paths resolve to `NOT_FOUND` and unsupported methods on
/// known paths to `BAD_REQUEST`, both once access is granted.
pub fn with_error_handling(routes: Router, state: &AppState) -> Router {
    routes
        .fallback(unknown_route)
        .method_not_allowed_fallback(unsupported_method)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.guard),
            security::enforce,
        ))
        .layer(middleware::from_fn_with_state(
            state.mapper.clone(),
            error_boundary,
        ))
        .layer(TraceLayer::new_for_http())
}

async fn unknown_route() -> AppError {
    AppError(Failure::NotFound(None))
}

async fn unsupported_method(method: Method) -> AppError {
    IllegalArgument(format!("method {method} is not supported for this path")).into()
}
