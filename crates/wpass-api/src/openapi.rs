//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI 3.1 document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Pass API",
        version = "0.1.0",
        description = "Builds and signs wallet passes (.pkpass) from pass editor data.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::passes::create_pass,
        crate::routes::passes::certificate_status,
        crate::routes::passes::create_generic_pass,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::passes::CreatePassRequest,
        crate::routes::passes::GenericPassRequest,
        crate::routes::passes::CertificateStatusResponse,
    )),
    tags(
        (name = "passes", description = "Pass builds and signing preconditions"),
    )
)]
pub struct ApiDoc;

/// Serves the document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_pass_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/passes"));
        assert!(doc.paths.paths.contains_key("/generic-pass"));
    }
}
