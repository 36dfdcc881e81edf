//! # Validator Issue Translation
//!
//! Turns raw engine issues into the client-facing [`ValidationError`]
//! envelope.
//!
//! Two passes, applied in this order by callers:
//!
//! 1. [`augment_enum_messages`] appends the allowed values to `enum`
//!    messages so clients see what they could have sent.
//! 2. [`to_validation_error`] maps each issue to a [`NormalizedIssue`],
//!    picking the most specific path available.
//!
//! Both passes keep issue count and order. Neither mutates its input.

use serde_json::Value;

use crate::envelope::{AdHocIssue, NormalizedIssue, RequestValidationError, ValidationError};
use crate::issue::{IssueParams, RawValidationIssue};

/// Suffix appended to an issue's keyword to form its error code.
pub const ERROR_CODE_SUFFIX: &str = ".openapi.validation";

/// Append allowed values to every `enum` issue's message.
///
/// `"<message>: v1, v2"` for enum issues with a non-empty value list; every
/// other issue is returned unchanged. An empty list counts as "no values".
pub fn augment_enum_messages(issues: &[RawValidationIssue]) -> Vec<RawValidationIssue> {
    issues
        .iter()
        .map(|issue| match &issue.params {
            IssueParams::Enum { allowed_values }
                if issue.keyword == "enum" && !allowed_values.is_empty() =>
            {
                let listed = allowed_values
                    .iter()
                    .map(render_allowed_value)
                    .collect::<Vec<_>>()
                    .join(", ");
                RawValidationIssue {
                    message: format!("{}: {listed}", issue.message),
                    ..issue.clone()
                }
            }
            _ => issue.clone(),
        })
        .collect()
}

/// Map raw issues, in order, onto a [`ValidationError`] with `status`.
pub fn to_validation_error(status: u16, issues: &[RawValidationIssue]) -> ValidationError {
    let errors = issues
        .iter()
        .map(|issue| {
            NormalizedIssue {
                path: issue_path(issue),
                message: issue.message.clone(),
                error_code: format!("{}{ERROR_CODE_SUFFIX}", issue.keyword),
            }
            .into()
        })
        .collect();
    ValidationError::new(status, errors)
}

/// Build a single-issue failure raised by the validation layer itself.
///
/// `detail`, when given, rides along as the issue's `errors` field.
pub fn build_ad_hoc_error(
    status: u16,
    path: impl Into<String>,
    message: impl Into<String>,
    detail: Option<Value>,
) -> RequestValidationError {
    let message = message.into();
    let issue = AdHocIssue {
        path: path.into(),
        message: message.clone(),
        errors: detail,
    };
    RequestValidationError::from_envelope(message, ValidationError::new(status, vec![issue.into()]))
}

/// Most specific location for an issue.
///
/// The engine reports required/additional-property violations against the
/// containing object, so the offending child name is appended. Failing
/// that, the data path; failing that, the schema path.
fn issue_path(issue: &RawValidationIssue) -> String {
    match &issue.params {
        IssueParams::Required { missing_property: child }
        | IssueParams::AdditionalProperties {
            additional_property: child,
        } if !child.is_empty() => format!("{}.{child}", issue.data_path),
        _ if !issue.data_path.is_empty() => issue.data_path.clone(),
        _ => issue.schema_path.clone(),
    }
}

// Strings are listed bare; null lists as nothing.
fn render_allowed_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
