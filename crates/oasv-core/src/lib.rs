//! # oasv-core — Request-Validation Metadata
//!
//! Pure value types and transformations shared by the schema and API
//! layers. Nothing in this crate performs I/O or runs a schema engine; it
//! only normalizes what those collaborators hand over.
//!
//! ## Components
//!
//! - [`content_type`]: parses a `Content-Type` header, strips multipart
//!   boundaries, and computes the set of header values considered
//!   equivalent for content-type matching.
//! - [`issue`]: [`RawValidationIssue`], the record a schema engine emits
//!   for one violation, with keyword-specific [`IssueParams`].
//! - [`translate`]: enum message augmentation and the issue → envelope
//!   mapping with its path-selection rules.
//! - [`envelope`]: the client-facing [`ValidationError`] envelope and the
//!   [`RequestValidationError`] propagated to transport-level handlers.
//!
//! ## Crate Policy
//!
//! - Leaf of the workspace DAG: depends on no other `oasv-*` crate.
//! - No `panic!()` or `.unwrap()` outside tests. Malformed input (absent
//!   headers, absent params, empty issue lists) is a valid zero-effect input.

pub mod content_type;
pub mod envelope;
pub mod issue;
pub mod translate;

pub use content_type::{ContentType, APPLICATION_JSON, JSON_EQUIVALENTS};
pub use envelope::{AdHocIssue, ErrorItem, NormalizedIssue, RequestValidationError, ValidationError};
pub use issue::{IssueParams, RawValidationIssue};
pub use translate::{augment_enum_messages, build_ad_hoc_error, to_validation_error, ERROR_CODE_SUFFIX};
