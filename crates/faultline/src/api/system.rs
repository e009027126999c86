//! System endpoints

use axum::Json;
use faultline_api::responses::HealthResponse;

/// Liveness check, reachable without credentials
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
