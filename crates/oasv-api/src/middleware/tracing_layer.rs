//! # Request Tracing
//!
//! `tower_http::trace::TraceLayer` configured so that rejected requests
//! show up next to the validation logs emitted by the extractors.

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Build the request tracing layer.
///
/// Spans carry method, URI and version. Responses are logged at `INFO`
/// so 4xx validation rejections are visible without enabling debug output.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
