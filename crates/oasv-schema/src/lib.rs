//! # oasv-schema — Schema Engine Adapter
//!
//! Runs request parts (body, query, headers, path params) through compiled
//! JSON Schema validators and hands the engine's complaints to
//! `oasv-core` for normalization.
//!
//! ## Schema Registry (`validate`)
//!
//! [`SchemaRegistry`] loads every `*.schema.json` / `*.schema.yaml` file
//! under a directory, resolves cross-schema `$ref`s locally, and compiles
//! one validator per schema up front. Key operation:
//!
//! - [`SchemaRegistry::validate_part`]: validates one request part and
//!   returns the normalized [`oasv_core::ValidationError`] envelope wrapped
//!   in [`SchemaError::ValidationFailed`] on failure.
//!
//! ## Engine Issues (`issues`)
//!
//! The [`issues`] module converts `jsonschema` errors into
//! [`oasv_core::RawValidationIssue`] records: keyword, dot/bracket data
//! path, `#`-prefixed schema path, and keyword-specific params.
//!
//! ## Crate Policy
//!
//! - Depends only on `oasv-core` internally.
//! - Schema resolution never touches the network.

pub mod issues;
pub mod validate;

pub use issues::{data_path, issues_from_error};
pub use validate::{SchemaError, SchemaRegistry, SCHEMA_URI_PREFIX};
