//! HTTP handlers for analysis endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AnalyzeContentCommand, AnalyzeContentHandler, AnalyzeFileCommand, AnalyzeFileHandler,
    AnalyzeUrlCommand, AnalyzeUrlHandler, BatchAnalyzeCommand, BatchAnalyzeHandler,
    CheckProviderHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::UploadedFile;

use super::dto::{
    settings_or_default, AnalysisResponse, AnalyzeTextRequest, AnalyzeUrlRequest,
    BatchAnalysisResponse, BatchAnalyzeRequest, ErrorResponse, HealthResponse, SettingsDto,
    StatusResponse,
};

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";
/// Multipart field carrying settings as a JSON string.
pub const SETTINGS_FIELD: &str = "settings";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AnalysisHandlers {
    content_handler: Arc<AnalyzeContentHandler>,
    url_handler: Arc<AnalyzeUrlHandler>,
    file_handler: Arc<AnalyzeFileHandler>,
    batch_handler: Arc<BatchAnalyzeHandler>,
    status_handler: Arc<CheckProviderHandler>,
}

impl AnalysisHandlers {
    pub fn new(
        content_handler: Arc<AnalyzeContentHandler>,
        url_handler: Arc<AnalyzeUrlHandler>,
        file_handler: Arc<AnalyzeFileHandler>,
        batch_handler: Arc<BatchAnalyzeHandler>,
        status_handler: Arc<CheckProviderHandler>,
    ) -> Self {
        Self {
            content_handler,
            url_handler,
            file_handler,
            batch_handler,
            status_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════

/// API error that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct AnalysisApiError(pub DomainError);

impl AnalysisApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyContent
            | ErrorCode::UnsupportedFormat
            | ErrorCode::ExtractorUnavailable => StatusCode::BAD_REQUEST,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::NoReadableText => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::FetchFailed | ErrorCode::AIProviderError | ErrorCode::ResponseParseFailed => {
                StatusCode::BAD_GATEWAY
            }
            ErrorCode::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for AnalysisApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for AnalysisApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::new(ErrorCode::ValidationFailed, rejection.body_text()))
    }
}

impl From<MultipartRejection> for AnalysisApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self(DomainError::new(ErrorCode::ValidationFailed, rejection.body_text()))
    }
}

impl From<MultipartError> for AnalysisApiError {
    fn from(err: MultipartError) -> Self {
        let code = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ErrorCode::PayloadTooLarge
        } else {
            ErrorCode::ValidationFailed
        };
        Self(DomainError::new(code, err.body_text()))
    }
}

impl IntoResponse for AnalysisApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "analysis request failed");
        } else {
            tracing::debug!(error = %self.0, "analysis request rejected");
        }

        let retry_after = self
            .0
            .details
            .get("retry_after_secs")
            .and_then(|secs| HeaderValue::from_str(secs).ok());

        let mut response = (status, Json(ErrorResponse::from(&self.0))).into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/status - Provider connectivity
pub async fn provider_status(State(handlers): State<AnalysisHandlers>) -> Json<StatusResponse> {
    Json(handlers.status_handler.handle().await.into())
}

/// POST /api/analyze/text - Analyze raw text
pub async fn analyze_text(
    State(handlers): State<AnalysisHandlers>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisApiError> {
    let Json(req) = payload?;
    let settings = settings_or_default(req.settings)?;

    let outcome = handlers
        .content_handler
        .handle(AnalyzeContentCommand::text(req.content, settings))
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/analyze/url - Fetch a page and analyze it
pub async fn analyze_url(
    State(handlers): State<AnalysisHandlers>,
    payload: Result<Json<AnalyzeUrlRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisApiError> {
    let Json(req) = payload?;
    let settings = settings_or_default(req.settings)?;

    let url = req.url.trim().to_string();
    if url.is_empty() {
        return Err(DomainError::from(ValidationError::empty_field("url")).into());
    }

    let outcome = handlers
        .url_handler
        .handle(AnalyzeUrlCommand {
            url,
            settings,
            include_page_context: req.include_page_context,
        })
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/analyze/file - Analyze an uploaded document
pub async fn analyze_file(
    State(handlers): State<AnalysisHandlers>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisApiError> {
    let mut multipart = multipart?;
    let mut upload = None;
    let mut settings_dto = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await?;

                let mut file = UploadedFile::new(bytes.to_vec());
                if let Some(name) = file_name {
                    file = file.with_file_name(name);
                }
                if let Some(content_type) = content_type {
                    file = file.with_content_type(content_type);
                }
                upload = Some(file);
            }
            Some(SETTINGS_FIELD) => {
                let raw = field.text().await?;
                if !raw.trim().is_empty() {
                    let dto: SettingsDto = serde_json::from_str(&raw).map_err(|err| {
                        DomainError::validation(SETTINGS_FIELD, format!("Invalid settings JSON: {}", err))
                    })?;
                    settings_dto = Some(dto);
                }
            }
            _ => {}
        }
    }

    let upload = upload
        .ok_or_else(|| DomainError::validation(FILE_FIELD, "Multipart field 'file' is required"))?;
    let settings = settings_or_default(settings_dto)?;

    let outcome = handlers
        .file_handler
        .handle(AnalyzeFileCommand { upload, settings })
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/analyze/batch - Analyze several texts
pub async fn analyze_batch(
    State(handlers): State<AnalysisHandlers>,
    payload: Result<Json<BatchAnalyzeRequest>, JsonRejection>,
) -> Result<Json<BatchAnalysisResponse>, AnalysisApiError> {
    let Json(req) = payload?;
    let settings = settings_or_default(req.settings)?;

    let outcome = handlers
        .batch_handler
        .handle(BatchAnalyzeCommand {
            items: req.items,
            settings,
        })
        .await?;
    Ok(Json(outcome.into()))
}
