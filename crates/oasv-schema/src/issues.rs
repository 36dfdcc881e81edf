//! # Engine Error Conversion
//!
//! Converts `jsonschema` validation errors into [`RawValidationIssue`]s.
//!
//! The engine reports locations as JSON Pointers (`/items/0/name`). Clients
//! of the validation layer expect dot/bracket data paths rooted at the
//! request part (`.body.items[0].name`), and `#`-prefixed schema paths, so
//! both are rewritten here. Messages for the keywords the translator treats
//! specially use fixed wording; everything else keeps the engine's text.

use std::fmt::Write as _;

use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;
use oasv_core::{IssueParams, RawValidationIssue};
use serde_json::{Map, Value};

const REQUIRED_MESSAGE: &str = "should have required property";
const ADDITIONAL_PROPERTIES_MESSAGE: &str = "should NOT have additional properties";
const ENUM_MESSAGE: &str = "should be equal to one of the allowed values";

/// Convert one engine error into raw issues.
///
/// Usually one issue per error; an `additionalProperties` error naming
/// several unexpected properties yields one issue per property.
///
/// `location` names the request part the instance came from (`body`,
/// `query`, ...) and prefixes every data path. `instance` is the validated
/// root, used to tell array indices from numeric object keys.
pub fn issues_from_error(
    error: &ValidationError<'_>,
    location: Option<&str>,
    instance: &Value,
) -> Vec<RawValidationIssue> {
    let pointer = error.instance_path.to_string();
    let engine_schema_path = error.schema_path.to_string();
    let data_path = data_path(location, &pointer, instance);
    let schema_path = format!("#{engine_schema_path}");
    let issue = |keyword: &str, message: String, params: IssueParams| RawValidationIssue {
        keyword: keyword.to_string(),
        message,
        data_path: data_path.clone(),
        schema_path: schema_path.clone(),
        params,
    };

    match &error.kind {
        ValidationErrorKind::Required { property, .. } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            vec![issue(
                "required",
                format!("{REQUIRED_MESSAGE} '{name}'"),
                IssueParams::Required {
                    missing_property: name,
                },
            )]
        }
        ValidationErrorKind::AdditionalProperties { unexpected, .. } => unexpected
            .iter()
            .map(|name| {
                issue(
                    "additionalProperties",
                    ADDITIONAL_PROPERTIES_MESSAGE.to_string(),
                    IssueParams::AdditionalProperties {
                        additional_property: name.clone(),
                    },
                )
            })
            .collect(),
        ValidationErrorKind::Enum { options, .. } => {
            let allowed_values = match options {
                Value::Array(values) => values.clone(),
                other => vec![other.clone()],
            };
            vec![issue(
                "enum",
                ENUM_MESSAGE.to_string(),
                IssueParams::Enum { allowed_values },
            )]
        }
        ValidationErrorKind::FalseSchema => vec![issue(
            "false schema",
            error.to_string(),
            IssueParams::default(),
        )],
        _ => vec![issue(
            keyword_of(&engine_schema_path),
            error.to_string(),
            IssueParams::Other(Map::new()),
        )],
    }
}

/// Render a JSON Pointer into the instance as a dot/bracket data path.
///
/// `/items/0/first-name` under location `body` becomes
/// `.body.items[0]['first-name']`. Array indices are detected against
/// `instance`; where the instance no longer covers the pointer, all-digit
/// segments are treated as indices.
pub fn data_path(location: Option<&str>, pointer: &str, instance: &Value) -> String {
    let mut out = String::new();
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        out.push('.');
        out.push_str(location);
    }

    let mut current = Some(instance);
    for raw in pointer.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Value::Array(items)) => {
                let _ = write!(out, "[{segment}]");
                current = segment.parse::<usize>().ok().and_then(|i| items.get(i));
            }
            Some(Value::Object(map)) => {
                push_property(&mut out, &segment);
                current = map.get(&segment);
            }
            _ => {
                if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                    let _ = write!(out, "[{segment}]");
                } else {
                    push_property(&mut out, &segment);
                }
                current = None;
            }
        }
    }
    out
}

fn push_property(out: &mut String, name: &str) {
    if is_identifier(name) {
        out.push('.');
        out.push_str(name);
    } else {
        let _ = write!(out, "['{}']", name.replace('\'', "\\'"));
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// The failing keyword is the last segment of the engine's schema path.
fn keyword_of(schema_path: &str) -> &str {
    match schema_path.rsplit('/').next() {
        Some(last) if !last.is_empty() && !last.bytes().all(|b| b.is_ascii_digit()) => last,
        _ => "schema",
    }
}
