//! # OpenAPI Components
//!
//! Schema components for the responses produced by this crate, ready to
//! be merged into an application's own `utoipa` document.

use oasv_core::{AdHocIssue, ErrorItem, NormalizedIssue, ValidationError};
use utoipa::OpenApi;

use crate::error::{ErrorBody, ErrorDetail};

/// Error response components: the validation envelope and the generic
/// error body.
#[derive(OpenApi)]
#[openapi(components(schemas(
    ValidationError,
    ErrorItem,
    NormalizedIssue,
    AdHocIssue,
    ErrorBody,
    ErrorDetail
)))]
pub struct ValidationErrorDoc;
