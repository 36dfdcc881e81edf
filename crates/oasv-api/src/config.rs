//! # Validator Configuration
//!
//! Settings for the validation layer. Defaults are usable as-is; each field
//! can be overridden from the environment:
//!
//! | Variable                     | Field                   |
//! |------------------------------|-------------------------|
//! | `OASV_SCHEMA_DIR`            | `schema_dir`            |
//! | `OASV_BODY_LIMIT`            | `body_limit` (bytes)    |
//! | `OASV_AUGMENT_ENUM_MESSAGES` | `augment_enum_messages` |
//! | `OASV_REQUEST_STATUS`        | `request_status`        |
//!
//! Unparsable values are ignored and the default is kept.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default request body limit: 2 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Configuration for request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Directory scanned for `*.schema.{json,yaml,yml}` files.
    pub schema_dir: PathBuf,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    /// Append allowed values to `enum` violation messages.
    pub augment_enum_messages: bool,
    /// Status for schema violations and malformed bodies.
    pub request_status: u16,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            body_limit: DEFAULT_BODY_LIMIT,
            augment_enum_messages: true,
            request_status: 400,
        }
    }
}

impl ValidatorConfig {
    /// Defaults overridden by `OASV_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("OASV_SCHEMA_DIR").filter(|d| !d.is_empty()) {
            self.schema_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("OASV_BODY_LIMIT").and_then(|v| v.trim().parse().ok()) {
            self.body_limit = limit;
        }
        if let Some(flag) = lookup("OASV_AUGMENT_ENUM_MESSAGES") {
            self.augment_enum_messages = flag.to_lowercase() != "false";
        }
        if let Some(status) = lookup("OASV_REQUEST_STATUS")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|s| (400..500).contains(s))
        {
            self.request_status = status;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.schema_dir, PathBuf::from("schemas"));
        assert_eq!(config.body_limit, 2 * 1024 * 1024);
        assert!(config.augment_enum_messages);
        assert_eq!(config.request_status, 400);
    }

    #[test]
    fn overrides_apply() {
        let config = ValidatorConfig::default().with_overrides(lookup(&[
            ("OASV_SCHEMA_DIR", "/etc/oasv"),
            ("OASV_BODY_LIMIT", "1024"),
            ("OASV_AUGMENT_ENUM_MESSAGES", "FALSE"),
            ("OASV_REQUEST_STATUS", "422"),
        ]));
        assert_eq!(config.schema_dir, PathBuf::from("/etc/oasv"));
        assert_eq!(config.body_limit, 1024);
        assert!(!config.augment_enum_messages);
        assert_eq!(config.request_status, 422);
    }

    #[test]
    fn unparsable_overrides_are_ignored() {
        let config = ValidatorConfig::default().with_overrides(lookup(&[
            ("OASV_BODY_LIMIT", "lots"),
            ("OASV_REQUEST_STATUS", "200"),
            ("OASV_SCHEMA_DIR", ""),
        ]));
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ValidatorConfig =
            serde_json::from_value(serde_json::json!({ "body_limit": 10 })).unwrap();
        assert_eq!(config.body_limit, 10);
        assert_eq!(config.request_status, 400);
    }
}
