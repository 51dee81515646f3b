//! # Pass Endpoints
//!
//! - `POST /passes` builds a pass from `{passType, passData}` and returns the
//!   signed archive as a download.
//! - `GET /passes` reports whether the signing credentials are in place.
//! - `POST /generic-pass` builds a generic pass, barcode included, from a
//!   bare `passData` object.
//!
//! Builds read credential files and do CPU-bound signing, so they run on
//! the blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::response::Attachment;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wpass_core::data::{non_empty, BarcodeSpec};
use wpass_core::{
    check_certificates, CertificateStatus, PassBuildRequest, PassBuilder, PassData, PassType,
    SignedPass,
};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

/// Media type of a signed pass archive.
pub const PKPASS_CONTENT_TYPE: &str = "application/vnd.apple.pkpass";

const GENERIC_PASS_TITLE: &str = "Generic Pass";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request to build a pass.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePassRequest {
    /// `eventTicket`, `boardingPass`, `storeCard`, `coupon`, `generic`, or
    /// one of the editor's short names (`event`, `boarding`, `loyalty`,
    /// `store`, `custom`).
    #[serde(default)]
    pub pass_type: Option<String>,
    /// Everything the editor captured about the pass.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub pass_data: Option<PassData>,
}

impl Validate for CreatePassRequest {
    fn validate(&self) -> Result<(), String> {
        let has_type = self
            .pass_type
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if has_type && self.pass_data.is_some() {
            Ok(())
        } else {
            Err("passType and passData are required".to_string())
        }
    }
}

/// Bare pass data, for the generic-pass endpoint.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct GenericPassRequest {
    #[schema(value_type = Object)]
    pub pass_data: PassData,
}

/// Certificate precondition status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateStatusResponse {
    pub valid: bool,
    pub message: String,
}

impl From<CertificateStatus> for CertificateStatusResponse {
    fn from(status: CertificateStatus) -> Self {
        Self {
            valid: status.valid,
            message: status.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/passes", post(create_pass).get(certificate_status))
        .route("/generic-pass", post(create_generic_pass))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /passes: Build and sign a pass.
#[utoipa::path(
    post,
    path = "/passes",
    request_body = CreatePassRequest,
    responses(
        (status = 200, description = "Signed pass archive (application/vnd.apple.pkpass)"),
        (status = 400, description = "Missing or unknown passType, or missing passData", body = crate::error::ErrorBody),
        (status = 500, description = "Credentials missing or signing failed", body = crate::error::ErrorBody),
    ),
    tag = "passes"
)]
pub(crate) async fn create_pass(
    State(state): State<AppState>,
    body: Result<Json<CreatePassRequest>, JsonRejection>,
) -> Result<Attachment<Vec<u8>>, AppError> {
    let req = extract_validated_json(body)?;
    let request = PassBuildRequest::from_parts(req.pass_type.as_deref(), req.pass_data)?;
    let pass = run_build(&state, request).await?;
    Ok(download(pass, "pass"))
}

/// GET /passes: Report whether the credential files are present.
#[utoipa::path(
    get,
    path = "/passes",
    responses(
        (status = 200, description = "Certificate status", body = CertificateStatusResponse),
        (status = 500, description = "Configuration is malformed", body = crate::error::ErrorBody),
    ),
    tag = "passes"
)]
pub(crate) async fn certificate_status(
    State(state): State<AppState>,
) -> Result<Json<CertificateStatusResponse>, AppError> {
    let config = state.pass_config()?;
    let status = check_certificates(&config.certificates);
    Ok(Json(status.into()))
}

/// POST /generic-pass: Build a generic pass from bare pass data.
#[utoipa::path(
    post,
    path = "/generic-pass",
    request_body = GenericPassRequest,
    responses(
        (status = 200, description = "Signed pass archive (application/vnd.apple.pkpass)"),
        (status = 400, description = "Body is not a pass data object", body = crate::error::ErrorBody),
        (status = 500, description = "Credentials missing or signing failed", body = crate::error::ErrorBody),
    ),
    tag = "passes"
)]
pub(crate) async fn create_generic_pass(
    State(state): State<AppState>,
    body: Result<Json<GenericPassRequest>, JsonRejection>,
) -> Result<Attachment<Vec<u8>>, AppError> {
    let GenericPassRequest { pass_data } = extract_json(body)?;
    let request = PassBuildRequest::new(PassType::Generic, generic_pass_data(pass_data));
    let pass = run_build(&state, request).await?;
    Ok(download(pass, "generic-pass"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Default the title and make sure a barcode is requested.
fn generic_pass_data(mut data: PassData) -> PassData {
    if non_empty(&data.title).is_none() {
        data.title = Some(GENERIC_PASS_TITLE.to_string());
    }
    if !data.barcode.as_ref().is_some_and(BarcodeSpec::is_requested) {
        data.barcode = Some(BarcodeSpec::Enabled(true));
    }
    data
}

async fn run_build(state: &AppState, request: PassBuildRequest) -> Result<SignedPass, AppError> {
    let config = state.pass_config()?;
    let signer = Arc::clone(&state.signer);
    let validator = state.validator.clone();

    let result = tokio::task::spawn_blocking(move || {
        let builder = PassBuilder::new(&config, &*signer);
        match validator.as_deref() {
            Some(validator) => builder.with_inspector(validator).build(&request),
            None => builder.build(&request),
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("build task: {e}")))?;

    Ok(result?)
}

fn download(pass: SignedPass, prefix: &str) -> Attachment<Vec<u8>> {
    let file_name = pass.file_name(prefix);
    tracing::info!(
        serial = %pass.serial,
        pass_type = %pass.pass_type,
        file_name = %file_name,
        "pass delivered"
    );
    Attachment::new(pass.bytes)
        .filename(file_name)
        .content_type(PKPASS_CONTENT_TYPE)
}
