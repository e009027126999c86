//! Probe endpoints used to check the authenticated and admin access paths

use axum::Extension;
use faultline_api::ApiError;

use crate::security::Principal;

/// Ping for any authenticated caller
#[utoipa::path(
    get,
    path = "/ping",
    tag = "probe",
    security(("basicAuth" = [])),
    responses(
        (status = 200, description = "Caller is authenticated", body = String),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 500, description = "Internal error", body = ApiError)
    )
)]
pub async fn ping() -> &'static str {
    "pong"
}

/// Admin ping, requires the admin role
#[utoipa::path(
    get,
    path = "/admin/ping",
    tag = "probe",
    security(("basicAuth" = [])),
    responses(
        (status = 200, description = "Caller holds the admin role", body = String),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError),
        (status = 500, description = "Internal error", body = ApiError)
    )
)]
pub async fn admin_ping(Extension(principal): Extension<Principal>) -> &'static str {
    tracing::debug!(user = %principal.name, "admin ping");
    "admin ok"
}
