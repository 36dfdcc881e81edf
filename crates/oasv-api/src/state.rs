//! # Application State
//!
//! Shared state for handlers that extract [`crate::ValidatedJson`]. The
//! compiled schema registry is loaded once and shared via `Arc`.

use std::sync::Arc;

use axum::extract::FromRef;
use oasv_schema::{SchemaError, SchemaRegistry};

use crate::config::ValidatorConfig;

/// Validation state carried by the router.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SchemaRegistry>,
    pub config: ValidatorConfig,
}

impl AppState {
    /// Wrap an already-built registry. The registry's enum augmentation is
    /// aligned with `config`.
    pub fn new(registry: SchemaRegistry, config: ValidatorConfig) -> Self {
        let registry = registry.with_enum_augmentation(config.augment_enum_messages);
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    /// Load every schema under `config.schema_dir`.
    pub fn from_config(config: ValidatorConfig) -> Result<Self, SchemaError> {
        let registry = SchemaRegistry::new(&config.schema_dir)?;
        Ok(Self::new(registry, config))
    }
}

impl FromRef<AppState> for Arc<SchemaRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

impl FromRef<AppState> for ValidatorConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_config_with_missing_dir_is_empty() {
        let config = ValidatorConfig {
            schema_dir: "/nonexistent/oasv/schemas".into(),
            ..ValidatorConfig::default()
        };
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.registry.schema_count(), 0);
    }

    #[test]
    fn from_ref_shares_the_registry() {
        let registry =
            SchemaRegistry::from_schemas([("pet", json!({ "type": "object" }))]).unwrap();
        let state = AppState::new(registry, ValidatorConfig::default());
        let shared: Arc<SchemaRegistry> = FromRef::from_ref(&state);
        assert!(Arc::ptr_eq(&shared, &state.registry));
        assert!(shared.contains("pet"));
    }

    #[test]
    fn augmentation_follows_config() {
        let registry = SchemaRegistry::from_schemas([(
            "pet",
            json!({ "properties": { "kind": { "enum": ["cat", "dog"] } } }),
        )])
        .unwrap();
        let config = ValidatorConfig {
            augment_enum_messages: false,
            ..ValidatorConfig::default()
        };
        let state = AppState::new(registry, config);
        let err = state
            .registry
            .validate_part("pet", Some("body"), &json!({ "kind": "fish" }), 400)
            .unwrap_err();
        let message = match err {
            SchemaError::ValidationFailed(e) => e.envelope().errors[0].message().to_string(),
            other => panic!("expected ValidationFailed, got {other}"),
        };
        assert_eq!(message, "should be equal to one of the allowed values");
    }
}
