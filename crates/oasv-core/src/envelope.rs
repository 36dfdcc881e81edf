//! # Validation Error Envelope
//!
//! The client-facing shape of a request-validation failure:
//!
//! ```json
//! { "status": 400, "errors": [ { "path": ".body.name", "message": "...", "errorCode": "required.openapi.validation" } ] }
//! ```
//!
//! [`RequestValidationError`] is what gets propagated to a transport-level
//! handler. It carries the status and a summary message next to the envelope,
//! so the handler never has to inspect `errors` to render a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// A validator issue translated into the stable API shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIssue {
    /// Most specific location of the violation, e.g. `.body.name`.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// `<keyword>.openapi.validation`.
    pub error_code: String,
}

/// An issue raised directly by the validation layer rather than a schema
/// engine (unsupported content type, unparsable body, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdHocIssue {
    pub path: String,
    pub message: String,
    /// Nested raw detail attached alongside the summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// One entry of [`ValidationError::errors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorItem {
    Normalized(NormalizedIssue),
    AdHoc(AdHocIssue),
}

impl ErrorItem {
    /// The issue's location.
    pub fn path(&self) -> &str {
        match self {
            Self::Normalized(issue) => &issue.path,
            Self::AdHoc(issue) => &issue.path,
        }
    }

    /// The issue's message.
    pub fn message(&self) -> &str {
        match self {
            Self::Normalized(issue) => &issue.message,
            Self::AdHoc(issue) => &issue.message,
        }
    }
}

impl From<NormalizedIssue> for ErrorItem {
    fn from(issue: NormalizedIssue) -> Self {
        Self::Normalized(issue)
    }
}

impl From<AdHocIssue> for ErrorItem {
    fn from(issue: AdHocIssue) -> Self {
        Self::AdHoc(issue)
    }
}

/// Response body for a failed request validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    /// HTTP status to respond with.
    pub status: u16,
    /// Issues in the order they were reported.
    pub errors: Vec<ErrorItem>,
}

impl ValidationError {
    pub fn new(status: u16, errors: Vec<ErrorItem>) -> Self {
        Self { status, errors }
    }

    /// Returns true if there are no issues.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of issues.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// One-line summary: `"<path> <message>"` per issue, comma separated.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{} {}", e.path(), e.message()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A validation failure ready to hand to a transport-level error handler.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RequestValidationError {
    status: u16,
    message: String,
    envelope: ValidationError,
}

impl RequestValidationError {
    /// Wrap an envelope with a message. The status is the envelope's.
    pub fn from_envelope(message: impl Into<String>, envelope: ValidationError) -> Self {
        Self {
            status: envelope.status,
            message: message.into(),
            envelope,
        }
    }

    /// Wrap an envelope, using its [`summary`](ValidationError::summary) as the message.
    pub fn summarize(envelope: ValidationError) -> Self {
        let message = envelope.summary();
        Self::from_envelope(message, envelope)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn envelope(&self) -> &ValidationError {
        &self.envelope
    }

    pub fn into_envelope(self) -> ValidationError {
        self.envelope
    }
}
