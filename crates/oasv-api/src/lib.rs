//! # oasv-api — Axum Integration
//!
//! Plugs the oasv validation layer into an Axum application owned by the
//! caller. Nothing here binds a socket or defines routes; handlers opt in
//! by extracting [`ValidatedJson`].
//!
//! ## Request Flow
//!
//! ```text
//! Content-Type check → body read (size limit) → JSON parse
//!   → schema validation (oasv-schema) → typed deserialization → handler
//! ```
//!
//! Every rejection is an [`AppError`]. Validation failures render the
//! `{status, errors}` envelope from `oasv-core` with the envelope's status;
//! server-side failures render a generic error body and are logged.
//!
//! ## Modules
//!
//! - [`config`]: [`ValidatorConfig`], defaults plus `OASV_*` overrides.
//! - [`state`]: [`AppState`] holding the shared schema registry.
//! - [`extractors`]: [`RequestBody`] and [`ValidatedJson`].
//! - [`error`]: [`AppError`] and its `IntoResponse` mapping.
//! - [`middleware`]: request tracing layer.
//! - [`openapi`]: OpenAPI components for the error responses.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod state;

pub use config::ValidatorConfig;
pub use error::AppError;
pub use extractors::{RequestBody, ValidatedJson};
pub use state::AppState;
