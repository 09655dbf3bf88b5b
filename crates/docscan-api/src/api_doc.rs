//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use crate::setup::routes::health;

/// Returns the served OpenAPI document.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docscan API",
        version = "0.1.0",
        description = "Document scanning API (v0). Upload a PNG or JPEG image as multipart/form-data and receive its recognised text. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::scan_upload::upload_scan,
        health::health_check,
        health::liveness_check,
    ),
    components(
        schemas(
            handlers::scan_upload::ScanResponse,
            health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "scans", description = "Document upload and text recognition"),
        (name = "health", description = "Liveness and health probes")
    )
)]
pub struct ApiDoc;
