//! Content source ports - turn URLs and uploads into analyzable text.
//!
//! [`ExtractionError`] is shared by every content adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::content::PageContext;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Port for retrieving a web page's readable text.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches `url` and extracts its main text.
    ///
    /// Page context is only collected when `include_page_context` is set.
    async fn fetch(
        &self,
        url: &str,
        include_page_context: bool,
    ) -> Result<FetchedPage, ExtractionError>;
}

/// Port for pulling text out of an uploaded file.
pub trait FileExtractor: Send + Sync {
    /// Extracts the file's text. Size limits are enforced here.
    fn extract(&self, upload: &UploadedFile) -> Result<String, ExtractionError>;
}

/// An upload as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    /// Declared MIME type.
    pub content_type: Option<String>,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Default::default()
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Text and context extracted from one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    /// Extracted text, whitespace already collapsed.
    pub text: String,
    pub page_context: Option<PageContext>,
}

/// Errors raised while turning input into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("no extractor available for {0}")]
    ExtractorUnavailable(String),

    #[error("no readable text found")]
    NoReadableText,

    #[error("content of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("fetch failed with HTTP status {0}")]
    HttpStatus(u16),

    #[error("fetch timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl ExtractionError {
    /// Error code reported at the API boundary.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractionError::InvalidUrl(_) => ErrorCode::ValidationFailed,
            ExtractionError::UnsupportedFormat(_) | ExtractionError::UnsupportedContentType(_) => {
                ErrorCode::UnsupportedFormat
            }
            ExtractionError::ExtractorUnavailable(_) => ErrorCode::ExtractorUnavailable,
            ExtractionError::NoReadableText => ErrorCode::NoReadableText,
            ExtractionError::TooLarge { .. } => ErrorCode::PayloadTooLarge,
            ExtractionError::HttpStatus(_)
            | ExtractionError::Timeout { .. }
            | ExtractionError::Fetch(_) => ErrorCode::FetchFailed,
        }
    }
}

impl From<ExtractionError> for DomainError {
    fn from(err: ExtractionError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match err {
            ExtractionError::HttpStatus(status) => domain.with_detail("status", status.to_string()),
            ExtractionError::TooLarge { limit, .. } => {
                domain.with_detail("limit_bytes", limit.to_string())
            }
            _ => domain,
        }
    }
}
