//! # Raw Validation Issues
//!
//! The record a schema engine emits for a single violation, before any
//! normalization. Engine params are shaped by the failing keyword, so they
//! are carried as the [`IssueParams`] tagged union rather than a loose map.
//!
//! Issues also (de)serialize from the engine JSON shape
//! `{keyword, message, dataPath, schemaPath, params}` so that an external
//! validator producing that format can feed the translator directly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keyword-specific parameters of a raw issue.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueParams {
    /// A required property is absent from the object at `data_path`.
    Required {
        /// Name of the missing property.
        missing_property: String,
    },
    /// The object at `data_path` has a property the schema disallows.
    AdditionalProperties {
        /// Name of the disallowed property.
        additional_property: String,
    },
    /// The value is not one of the schema's enumerated values.
    Enum {
        /// The permitted values, in schema order.
        allowed_values: Vec<Value>,
    },
    /// Any other keyword; params are kept opaque.
    Other(Map<String, Value>),
}

impl Default for IssueParams {
    fn default() -> Self {
        Self::Other(Map::new())
    }
}

impl IssueParams {
    /// Classify engine params for the given keyword.
    ///
    /// `enum` params become [`IssueParams::Enum`] when they carry an
    /// `allowedValues` array. Otherwise a string `missingProperty` (emitted by
    /// `required` and `dependencies`) or `additionalProperty` selects the
    /// matching variant. Absent, null, or non-object params are an empty
    /// [`IssueParams::Other`].
    pub fn from_engine(keyword: &str, params: Option<Value>) -> Self {
        let Some(Value::Object(map)) = params else {
            return Self::default();
        };

        if keyword == "enum" {
            if let Some(Value::Array(values)) = map.get("allowedValues") {
                return Self::Enum {
                    allowed_values: values.clone(),
                };
            }
        }
        if let Some(Value::String(name)) = map.get("missingProperty") {
            return Self::Required {
                missing_property: name.clone(),
            };
        }
        if let Some(Value::String(name)) = map.get("additionalProperty") {
            return Self::AdditionalProperties {
                additional_property: name.clone(),
            };
        }
        Self::Other(map)
    }

    /// Render back into the engine's params object.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Required { missing_property } => {
                serde_json::json!({ "missingProperty": missing_property })
            }
            Self::AdditionalProperties { additional_property } => {
                serde_json::json!({ "additionalProperty": additional_property })
            }
            Self::Enum { allowed_values } => {
                serde_json::json!({ "allowedValues": allowed_values })
            }
            Self::Other(map) => Value::Object(map.clone()),
        }
    }
}

/// One violation reported by a schema engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IssueRecord", into = "IssueRecord")]
pub struct RawValidationIssue {
    /// Name of the failing rule, e.g. `required` or `type`.
    pub keyword: String,
    /// Engine-provided description.
    pub message: String,
    /// Location of the failing datum, e.g. `.body.items[0]`.
    pub data_path: String,
    /// Location of the failing rule inside the schema.
    pub schema_path: String,
    pub params: IssueParams,
}

impl RawValidationIssue {
    /// Create an issue with empty locations and no params.
    pub fn new(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the data path.
    pub fn at(mut self, data_path: impl Into<String>) -> Self {
        self.data_path = data_path.into();
        self
    }

    /// Set the schema path.
    pub fn with_schema_path(mut self, schema_path: impl Into<String>) -> Self {
        self.schema_path = schema_path.into();
        self
    }

    /// Set the params.
    pub fn with_params(mut self, params: IssueParams) -> Self {
        self.params = params;
        self
    }
}

/// Wire shape of an engine issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IssueRecord {
    keyword: String,
    message: String,
    data_path: String,
    schema_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl From<IssueRecord> for RawValidationIssue {
    fn from(record: IssueRecord) -> Self {
        let params = IssueParams::from_engine(&record.keyword, record.params);
        Self {
            keyword: record.keyword,
            message: record.message,
            data_path: record.data_path,
            schema_path: record.schema_path,
            params,
        }
    }
}

impl From<RawValidationIssue> for IssueRecord {
    fn from(issue: RawValidationIssue) -> Self {
        let params = issue.params.to_value();
        Self {
            keyword: issue.keyword,
            message: issue.message,
            data_path: issue.data_path,
            schema_path: issue.schema_path,
            params: Some(params),
        }
    }
}
