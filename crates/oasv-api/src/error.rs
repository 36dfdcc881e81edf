//! # API Error Types
//!
//! [`AppError`] implements `axum::response::IntoResponse`. Request
//! validation failures are rendered as the validation envelope itself,
//! with the envelope's status code. Everything else uses [`ErrorBody`].
//! Internal error details are logged and never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use oasv_core::RequestValidationError;
use oasv_schema::SchemaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body for errors that are not request validation failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "PAYLOAD_TOO_LARGE").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request failed validation. Rendered as the validation envelope.
    #[error(transparent)]
    RequestValidation(#[from] RequestValidationError),

    /// Request body exceeded the configured limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::RequestValidation(err) => (
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::BAD_REQUEST),
                "VALIDATION_ERROR",
            ),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            Self::RequestValidation(err) => {
                return (status, Json(err.into_envelope())).into_response();
            }
            Self::Internal(ref detail) => {
                tracing::error!(error = %detail, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Schema violations pass through as validation failures. Anything else
/// means the registry or a route's schema name is misconfigured.
impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::ValidationFailed(e) => Self::RequestValidation(e),
            other => Self::Internal(other.to_string()),
        }
    }
}
