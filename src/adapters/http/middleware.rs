//! Request timeout middleware.
//!
//! A request that outlives the configured budget is dropped and answered
//! with the same JSON error body every other failure uses.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/analyze/text", post(analyze_text))
//!     .layer(middleware::from_fn_with_state(timeout, request_timeout_middleware));
//! ```

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::foundation::{DomainError, ErrorCode};

use super::analysis::AnalysisApiError;

/// Runs the rest of the stack under `timeout`.
pub async fn request_timeout_middleware(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%path, timeout_secs = timeout.as_secs(), "request timed out");
            AnalysisApiError::from(timed_out(timeout)).into_response()
        }
    }
}

fn timed_out(timeout: Duration) -> DomainError {
    DomainError::new(
        ErrorCode::RequestTimeout,
        format!("Request did not complete within {}s", timeout.as_secs()),
    )
    .with_detail("timeout_secs", timeout.as_secs().to_string())
}
