//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`BuildError`] kinds to HTTP status codes. Every error body has the
//! same shape, `{"error": "<message>"}`, which the pass editor displays as-is.
//! Internal error details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use wpass_core::{BuildError, ConfigError, ErrorKind};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request is missing required fields or names an unknown type (400).
    #[error("{0}")]
    Validation(String),

    /// Credentials or environment are not usable (500).
    #[error("{0}")]
    Configuration(String),

    /// The signer rejected the pass (500).
    #[error("{0}")]
    Signing(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Signing(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) | Self::Signing(_) => {
                tracing::error!(error = %self, status = status.as_u16(), "request failed")
            }
            _ => tracing::warn!(error = %self, status = status.as_u16(), "request rejected"),
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::Configuration => Self::Configuration(message),
            ErrorKind::Signing => Self::Signing(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::from(BuildError::from(err))
    }
}
