//! # Validated JSON Extraction
//!
//! [`ValidatedJson<T>`] runs the whole request-body pipeline before a
//! handler sees the value: media type, size limit, JSON syntax, schema,
//! then typed deserialization. Each failure is an [`AppError`] whose body
//! is the validation envelope.
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct CreateOrder { id: String }
//!
//! impl RequestBody for CreateOrder {
//!     const SCHEMA: &'static str = "order";
//! }
//!
//! async fn create(ValidatedJson(order): ValidatedJson<CreateOrder>) -> StatusCode {
//!     StatusCode::CREATED
//! }
//! ```

use std::sync::Arc;

use axum::extract::{FromRef, FromRequest, Request};
use axum::http::StatusCode;
use http_body_util::LengthLimitError;
use oasv_core::{build_ad_hoc_error, ContentType, APPLICATION_JSON};
use oasv_schema::SchemaRegistry;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::ValidatorConfig;
use crate::error::AppError;

/// Counter for rejected requests, labelled by `kind`.
pub const VALIDATION_FAILURES_METRIC: &str = "oasv_request_validation_failures_total";

const CONTENT_TYPE_PATH: &str = ".headers.content-type";
const BODY_PATH: &str = ".body";

/// A request DTO bound to a named schema in the registry.
pub trait RequestBody {
    /// Registry name of the schema the raw body must satisfy.
    const SCHEMA: &'static str;

    /// Media types the operation declares for its body.
    const CONTENT_TYPES: &'static [&'static str] = &[APPLICATION_JSON];
}

/// Extractor yielding a body that passed schema validation.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: RequestBody + DeserializeOwned,
    S: Send + Sync,
    Arc<SchemaRegistry>: FromRef<S>,
    ValidatorConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let registry = Arc::<SchemaRegistry>::from_ref(state);
        let config = ValidatorConfig::from_ref(state);
        let status = config.request_status;

        let content_type = ContentType::from_headers(req.headers());
        if content_type.matches_any(T::CONTENT_TYPES).is_none() {
            record_failure("content_type");
            tracing::debug!(
                schema = T::SCHEMA,
                content_type = %content_type,
                "unsupported request media type"
            );
            return Err(build_ad_hoc_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE.as_u16(),
                CONTENT_TYPE_PATH,
                unsupported_media_type_message(content_type.raw()),
                None,
            )
            .into());
        }

        let bytes = match axum::body::to_bytes(req.into_body(), config.body_limit).await {
            Ok(bytes) => bytes,
            Err(err) => {
                let inner = err.into_inner();
                if inner.is::<LengthLimitError>() {
                    record_failure("body_limit");
                    return Err(AppError::PayloadTooLarge(format!(
                        "request body exceeds {} bytes",
                        config.body_limit
                    )));
                }
                record_failure("body_read");
                tracing::debug!(error = %inner, "failed to read request body");
                return Err(
                    build_ad_hoc_error(status, BODY_PATH, "failed to read request body", None)
                        .into(),
                );
            }
        };

        if bytes.is_empty() {
            record_failure("body_missing");
            return Err(build_ad_hoc_error(status, BODY_PATH, "request body is required", None).into());
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|err| {
            record_failure("syntax");
            AppError::from(build_ad_hoc_error(
                status,
                BODY_PATH,
                "request body is not valid JSON",
                Some(json!([{
                    "message": err.to_string(),
                    "line": err.line(),
                    "column": err.column(),
                }])),
            ))
        })?;

        registry
            .validate_part(T::SCHEMA, Some("body"), &value, status)
            .map_err(|err| {
                record_failure("schema");
                AppError::from(err)
            })?;

        serde_json::from_value(value).map(ValidatedJson).map_err(|err| {
            record_failure("deserialize");
            AppError::from(build_ad_hoc_error(status, BODY_PATH, err.to_string(), None))
        })
    }
}

/// The 415 message quotes the header exactly as the client sent it.
fn unsupported_media_type_message(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => format!("unsupported media type {raw}"),
        None => "unsupported media type".to_string(),
    }
}

fn record_failure(kind: &'static str) {
    metrics::counter!(VALIDATION_FAILURES_METRIC, "kind" => kind).increment(1);
}
