//! # Middleware
//!
//! Tower layers shared by applications that embed the validation layer.

pub mod tracing_layer;
