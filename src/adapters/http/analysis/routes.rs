//! HTTP routes for analysis endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{
    analyze_batch, analyze_file, analyze_text, analyze_url, health, provider_status,
    AnalysisHandlers,
};

/// Room for multipart boundaries and the settings field on top of the file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Creates the analysis router.
///
/// `max_upload_bytes` is the largest accepted document; request bodies may
/// exceed it by [`MULTIPART_OVERHEAD_BYTES`] so that oversized documents
/// reach the extractor and get a structured error.
pub fn analysis_routes(handlers: AnalysisHandlers, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(provider_status))
        .route("/api/analyze/text", post(analyze_text))
        .route("/api/analyze/url", post(analyze_url))
        .route("/api/analyze/file", post(analyze_file))
        .route("/api/analyze/batch", post(analyze_batch))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .with_state(handlers)
}
