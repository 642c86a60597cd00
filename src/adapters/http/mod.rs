//! HTTP adapters - REST API implementations.

pub mod analysis;
pub mod middleware;

pub use analysis::{analysis_routes, AnalysisHandlers};
pub use middleware::request_timeout_middleware;
