//! OpenAPI document

use axum::Json;
use faultline_api::{ApiError, ErrorCode, ValidationErrorDetail, responses::HealthResponse};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api::{probe, system};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "faultline",
        description = "Standard error contract and access probes"
    ),
    paths(system::health, probe::ping, probe::admin_ping),
    components(schemas(ApiError, ErrorCode, ValidationErrorDetail, HealthResponse)),
    modifiers(&BasicAuth),
    tags(
        (name = "system", description = "Liveness"),
        (name = "probe", description = "Authenticated and admin access checks")
    )
)]
pub struct ApiDoc;

struct BasicAuth;

impl Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basicAuth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
    }
}

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
