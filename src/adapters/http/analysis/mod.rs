//! HTTP adapter for analysis endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AnalysisResponse, AnalyzeTextRequest, AnalyzeUrlRequest, BatchAnalysisResponse,
    BatchAnalyzeRequest, BatchItemResponse, CategoryScoreResponse, ErrorResponse, HealthResponse,
    RiskResultResponse, SettingsDto, StatusResponse,
};
pub use handlers::{AnalysisApiError, AnalysisHandlers, FILE_FIELD, SETTINGS_FIELD};
pub use routes::{analysis_routes, MULTIPART_OVERHEAD_BYTES};
