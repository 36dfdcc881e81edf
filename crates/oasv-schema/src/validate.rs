//! # Request Schema Validation
//!
//! Loads request schemas from disk (or memory), compiles one `jsonschema`
//! validator per schema, and validates request parts against them.
//!
//! ## Schema Resolution
//!
//! Every schema is registered under its `$id`. Schemas without one get a
//! derived `$id` of the form `https://schemas.oasv.local/<relative path>`,
//! so a sibling reference such as `{"$ref": "pet.schema.json"}` resolves
//! against the registry. A local retriever serves every cross-schema
//! `$ref`; unknown URIs fail compilation instead of reaching the network.
//!
//! ## Failure Shape
//!
//! A failed validation is returned as [`SchemaError::ValidationFailed`]
//! carrying the normalized envelope: engine errors are converted to raw
//! issues, enum messages are augmented, and issues are translated with
//! their path rules.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use oasv_core::{augment_enum_messages, to_validation_error, RawValidationIssue, RequestValidationError};
use serde_json::Value;
use thiserror::Error;

use crate::issues::issues_from_error;

/// Base URI for schemas that do not declare an `$id`.
pub const SCHEMA_URI_PREFIX: &str = "https://schemas.oasv.local/";

const SCHEMA_SUFFIXES: [&str; 3] = [".schema.json", ".schema.yaml", ".schema.yml"];

/// Errors returned by the schema registry.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema file could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    Load {
        /// Path of the offending file.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A schema could not be compiled into a validator.
    #[error("failed to compile schema {schema}: {reason}")]
    Compile {
        /// Registry name of the schema.
        schema: String,
        /// Human-readable reason.
        reason: String,
    },

    /// No schema is registered under the requested name.
    #[error("schema not found: {0}")]
    NotFound(String),

    /// The instance did not conform to the schema.
    #[error("request validation failed: {0}")]
    ValidationFailed(#[from] RequestValidationError),

    /// I/O error while scanning the schema directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serves cross-schema `$ref`s from the registry's own schemas.
struct LocalSchemaRetriever {
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(&self, uri: &Uri<&str>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas_by_uri
            .get(uri_str)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

/// A registered schema and its compiled validator.
struct CompiledSchema {
    uri: String,
    schema: Value,
    validator: Validator,
}

/// Request schemas, compiled and ready to validate against.
///
/// Built once and shared read-only; compiled validators are `Send + Sync`.
pub struct SchemaRegistry {
    schemas: HashMap<String, CompiledSchema>,
    augment_enum_messages: bool,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.schema_names())
            .field("augment_enum_messages", &self.augment_enum_messages)
            .finish()
    }
}

impl SchemaRegistry {
    /// Load and compile every schema file under `schema_dir`.
    ///
    /// Files named `<name>.schema.json`, `<name>.schema.yaml` or
    /// `<name>.schema.yml` are picked up recursively and registered as
    /// `<name>`. A directory that does not exist yields an empty registry.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Load`] for unreadable or unparsable files and
    /// duplicate names; [`SchemaError::Compile`] for schemas the engine
    /// rejects.
    pub fn new(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.as_ref();
        if !schema_dir.is_dir() {
            tracing::warn!(dir = %schema_dir.display(), "schema directory not found; registry is empty");
            return Self::from_schemas(Vec::<(String, Value)>::new());
        }

        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for path in glob_schemas(schema_dir)? {
            let Some((name, relative)) = schema_name(schema_dir, &path) else {
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::Load {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let parsed = if relative.ends_with(".json") {
                serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())
            } else {
                serde_yaml::from_str::<Value>(&content).map_err(|e| e.to_string())
            };
            let schema = parsed.map_err(|reason| SchemaError::Load {
                path: path.display().to_string(),
                reason,
            })?;
            if !seen.insert(name.clone()) {
                return Err(SchemaError::Load {
                    path: path.display().to_string(),
                    reason: format!("duplicate schema name '{name}'"),
                });
            }
            entries.push((name, relative, schema));
        }

        let registry = Self::compile(entries)?;
        tracing::info!(
            dir = %schema_dir.display(),
            count = registry.schema_count(),
            "schema registry loaded"
        );
        Ok(registry)
    }

    /// Build a registry from in-memory `(name, schema)` pairs.
    ///
    /// Schemas without an `$id` are addressable as
    /// `https://schemas.oasv.local/<name>.schema.json`.
    pub fn from_schemas<N: Into<String>>(
        schemas: impl IntoIterator<Item = (N, Value)>,
    ) -> Result<Self, SchemaError> {
        let entries = schemas
            .into_iter()
            .map(|(name, schema)| {
                let name = name.into();
                let relative = format!("{name}.schema.json");
                (name, relative, schema)
            })
            .collect();
        Self::compile(entries)
    }

    /// Enable or disable listing allowed values in `enum` messages.
    pub fn with_enum_augmentation(mut self, enabled: bool) -> Self {
        self.augment_enum_messages = enabled;
        self
    }

    /// Returns the number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Returns the registered names, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Look up a schema document by name.
    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name).map(|c| &c.schema)
    }

    /// The `$id` a schema is registered under.
    pub fn schema_uri(&self, name: &str) -> Option<&str> {
        self.schemas.get(name).map(|c| c.uri.as_str())
    }

    /// Run the named schema over `instance` and return the raw engine issues.
    ///
    /// `location` is the request part (`body`, `query`, ...) prefixed to
    /// every data path.
    pub fn issues_for(
        &self,
        name: &str,
        location: Option<&str>,
        instance: &Value,
    ) -> Result<Vec<RawValidationIssue>, SchemaError> {
        let compiled = self
            .schemas
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        Ok(compiled
            .validator
            .iter_errors(instance)
            .flat_map(|e| issues_from_error(&e, location, instance))
            .collect())
    }

    /// Validate one request part against the named schema.
    ///
    /// # Errors
    ///
    /// [`SchemaError::ValidationFailed`] with the normalized envelope
    /// (status `status`) when the instance is invalid;
    /// [`SchemaError::NotFound`] for an unknown schema.
    pub fn validate_part(
        &self,
        name: &str,
        location: Option<&str>,
        instance: &Value,
        status: u16,
    ) -> Result<(), SchemaError> {
        let issues = self.issues_for(name, location, instance)?;
        if issues.is_empty() {
            return Ok(());
        }

        let issues = if self.augment_enum_messages {
            augment_enum_messages(&issues)
        } else {
            issues
        };
        let envelope = to_validation_error(status, &issues);
        tracing::debug!(
            schema = name,
            location = location.unwrap_or(""),
            issues = envelope.len(),
            "request part failed schema validation"
        );
        Err(RequestValidationError::summarize(envelope).into())
    }

    fn compile(entries: Vec<(String, String, Value)>) -> Result<Self, SchemaError> {
        let mut schemas_by_uri = HashMap::new();
        let mut registered = Vec::with_capacity(entries.len());

        for (name, relative, mut schema) in entries {
            let uri = match schema.get("$id").and_then(|v| v.as_str()) {
                Some(id) => id.to_string(),
                None => {
                    let uri = format!("{SCHEMA_URI_PREFIX}{relative}");
                    if let Value::Object(map) = &mut schema {
                        map.insert("$id".to_string(), Value::String(uri.clone()));
                    }
                    uri
                }
            };
            schemas_by_uri.insert(uri.clone(), schema.clone());
            registered.push((name, uri, schema));
        }

        let schemas_by_uri = Arc::new(schemas_by_uri);
        let mut schemas = HashMap::with_capacity(registered.len());
        for (name, uri, schema) in registered {
            let retriever = LocalSchemaRetriever {
                schemas_by_uri: Arc::clone(&schemas_by_uri),
            };
            let validator = jsonschema::options()
                .with_draft(jsonschema::Draft::Draft7)
                .with_retriever(retriever)
                .build(&schema)
                .map_err(|e| SchemaError::Compile {
                    schema: name.clone(),
                    reason: e.to_string(),
                })?;
            tracing::debug!(schema = %name, uri = %uri, "compiled request schema");
            schemas.insert(
                name,
                CompiledSchema {
                    uri,
                    schema,
                    validator,
                },
            );
        }

        Ok(Self {
            schemas,
            augment_enum_messages: true,
        })
    }
}

/// Registry name and `/`-separated relative path for a schema file.
fn schema_name(root: &Path, path: &Path) -> Option<(String, String)> {
    let file_name = path.file_name()?.to_str()?;
    let name = SCHEMA_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))?;
    let relative = path
        .strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some((name.to_string(), relative))
}

/// Recursively collect schema file paths, sorted.
fn glob_schemas(dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
    let mut results = Vec::new();
    walk_for_schemas(dir, &mut results)?;
    results.sort();
    Ok(results)
}

fn walk_for_schemas(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), SchemaError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_for_schemas(&path, acc)?;
        } else if path
            .file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|name| SCHEMA_SUFFIXES.iter().any(|s| name.ends_with(s)))
        {
            acc.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasv_core::ErrorItem;
    use serde_json::json;

    fn pet_registry() -> SchemaRegistry {
        SchemaRegistry::from_schemas([
            (
                "pet",
                json!({
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string" },
                        "status": { "enum": ["available", "pending", "sold"] },
                        "tag": { "$ref": "tag.schema.json" }
                    },
                    "additionalProperties": false
                }),
            ),
            (
                "tag",
                json!({
                    "type": "object",
                    "required": ["label"],
                    "properties": { "label": { "type": "string" } }
                }),
            ),
        ])
        .unwrap()
    }

    fn envelope_of(err: SchemaError) -> oasv_core::ValidationError {
        match err {
            SchemaError::ValidationFailed(e) => e.into_envelope(),
            other => panic!("expected ValidationFailed, got {other}"),
        }
    }

    #[test]
    fn valid_instance_passes() {
        let registry = pet_registry();
        registry
            .validate_part("pet", Some("body"), &json!({ "name": "Rex", "status": "sold" }), 400)
            .unwrap();
    }

    #[test]
    fn missing_property_reports_child_path() {
        let registry = pet_registry();
        let err = registry
            .validate_part("pet", Some("body"), &json!({}), 400)
            .unwrap_err();
        let envelope = envelope_of(err);
        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.len(), 1);
        match &envelope.errors[0] {
            ErrorItem::Normalized(issue) => {
                assert_eq!(issue.path, ".body.name");
                assert_eq!(issue.error_code, "required.openapi.validation");
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn enum_message_is_augmented_by_default() {
        let registry = pet_registry();
        let err = registry
            .validate_part("pet", Some("body"), &json!({ "name": "Rex", "status": "lost" }), 400)
            .unwrap_err();
        let envelope = envelope_of(err);
        assert_eq!(envelope.errors[0].path(), ".body.status");
        assert_eq!(
            envelope.errors[0].message(),
            "should be equal to one of the allowed values: available, pending, sold"
        );
    }

    #[test]
    fn enum_augmentation_can_be_disabled() {
        let registry = pet_registry().with_enum_augmentation(false);
        let err = registry
            .validate_part("pet", Some("body"), &json!({ "name": "Rex", "status": "lost" }), 400)
            .unwrap_err();
        let envelope = envelope_of(err);
        assert_eq!(
            envelope.errors[0].message(),
            "should be equal to one of the allowed values"
        );
    }

    #[test]
    fn cross_schema_ref_resolves() {
        let registry = pet_registry();
        let err = registry
            .validate_part("pet", Some("body"), &json!({ "name": "Rex", "tag": {} }), 400)
            .unwrap_err();
        let envelope = envelope_of(err);
        assert_eq!(envelope.errors[0].path(), ".body.tag.label");
    }

    #[test]
    fn retrievers_share_one_uri_map() {
        let shared = Arc::new(HashMap::from([(
            format!("{SCHEMA_URI_PREFIX}tag.schema.json"),
            json!({ "type": "object" }),
        )]));
        let retrievers: Vec<LocalSchemaRetriever> = (0..4)
            .map(|_| LocalSchemaRetriever {
                schemas_by_uri: Arc::clone(&shared),
            })
            .collect();
        assert_eq!(Arc::strong_count(&shared), 5);
        assert!(retrievers
            .iter()
            .all(|r| Arc::ptr_eq(&r.schemas_by_uri, &shared)));
    }

    #[test]
    fn ref_chain_across_many_schemas_resolves() {
        let schemas = (0..8).map(|i| {
            let schema = if i == 7 {
                json!({ "type": "object", "required": ["leaf"] })
            } else {
                json!({
                    "type": "object",
                    "properties": { "next": { "$ref": format!("link{}.schema.json", i + 1) } }
                })
            };
            (format!("link{i}"), schema)
        });
        let registry = SchemaRegistry::from_schemas(schemas).unwrap();
        assert_eq!(registry.schema_count(), 8);

        let mut instance = json!({});
        for _ in 0..7 {
            instance = json!({ "next": instance });
        }
        let err = registry
            .validate_part("link0", Some("body"), &instance, 400)
            .unwrap_err();
        let envelope = envelope_of(err);
        assert_eq!(
            envelope.errors[0].path(),
            ".body.next.next.next.next.next.next.next.leaf"
        );
    }

    #[test]
    fn failure_message_summarizes_issues() {
        let registry = pet_registry();
        let err = registry
            .validate_part("pet", Some("body"), &json!({ "name": 7 }), 400)
            .unwrap_err();
        match err {
            SchemaError::ValidationFailed(e) => {
                assert!(e.message().starts_with(".body.name "), "got {}", e.message());
            }
            other => panic!("expected ValidationFailed, got {other}"),
        }
    }

    #[test]
    fn unknown_schema_is_not_found() {
        let registry = pet_registry();
        let err = registry.issues_for("owner", None, &json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::NotFound(ref n) if n == "owner"));
    }

    #[test]
    fn derived_uri_for_schema_without_id() {
        let registry = pet_registry();
        assert_eq!(
            registry.schema_uri("pet"),
            Some("https://schemas.oasv.local/pet.schema.json")
        );
        assert_eq!(registry.schema_names(), vec!["pet", "tag"]);
        assert!(registry.contains("tag"));
    }

    #[test]
    fn explicit_id_is_kept() {
        let registry = SchemaRegistry::from_schemas([(
            "order",
            json!({ "$id": "https://example.com/order.json", "type": "object" }),
        )])
        .unwrap();
        assert_eq!(registry.schema_uri("order"), Some("https://example.com/order.json"));
    }

    #[test]
    fn missing_directory_gives_empty_registry() {
        let registry = SchemaRegistry::new("/nonexistent/oasv/schemas").unwrap();
        assert_eq!(registry.schema_count(), 0);
    }

    #[test]
    fn schema_name_strips_suffix_and_keeps_relative_path() {
        let root = Path::new("/srv/schemas");
        let (name, relative) = schema_name(root, Path::new("/srv/schemas/v1/pet.schema.yaml")).unwrap();
        assert_eq!(name, "pet");
        assert_eq!(relative, "v1/pet.schema.yaml");
        assert!(schema_name(root, Path::new("/srv/schemas/readme.md")).is_none());
    }

    #[test]
    fn debug_lists_schema_names() {
        let debug = format!("{:?}", pet_registry());
        assert!(debug.contains("SchemaRegistry"));
        assert!(debug.contains("pet"));
    }
}
