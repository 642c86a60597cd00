//! Handlers that obtain text from a URL or an upload, then analyze it.

use std::sync::Arc;

use crate::domain::content::SourceKind;
use crate::domain::foundation::DomainError;
use crate::domain::settings::AnalysisSettings;
use crate::ports::{ContentFetcher, FileExtractor, UploadedFile};

use super::analyze_content::{AnalysisOutcome, AnalyzeContentCommand, AnalyzeContentHandler};

/// Command to analyze a web page.
#[derive(Debug, Clone)]
pub struct AnalyzeUrlCommand {
    pub url: String,
    pub settings: AnalysisSettings,
    /// Also collect images and metadata and show them to the model.
    pub include_page_context: bool,
}

/// Fetches a page and analyzes its main text.
pub struct AnalyzeUrlHandler {
    fetcher: Arc<dyn ContentFetcher>,
    analyzer: Arc<AnalyzeContentHandler>,
}

impl AnalyzeUrlHandler {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, analyzer: Arc<AnalyzeContentHandler>) -> Self {
        Self { fetcher, analyzer }
    }

    pub async fn handle(&self, cmd: AnalyzeUrlCommand) -> Result<AnalysisOutcome, DomainError> {
        let page = self
            .fetcher
            .fetch(&cmd.url, cmd.include_page_context)
            .await
            .map_err(|err| {
                tracing::warn!(url = %cmd.url, error = %err, "content extraction failed");
                DomainError::from(err).with_detail("url", cmd.url.clone())
            })?;

        let command = AnalyzeContentCommand::text(page.text, cmd.settings)
            .with_source(SourceKind::Url, Some(page.url))
            .with_page_context(page.page_context);
        self.analyzer.handle(command).await
    }
}

/// Command to analyze an uploaded file.
#[derive(Debug, Clone)]
pub struct AnalyzeFileCommand {
    pub upload: UploadedFile,
    pub settings: AnalysisSettings,
}

/// Extracts an upload's text and analyzes it.
pub struct AnalyzeFileHandler {
    extractor: Arc<dyn FileExtractor>,
    analyzer: Arc<AnalyzeContentHandler>,
}

impl AnalyzeFileHandler {
    pub fn new(extractor: Arc<dyn FileExtractor>, analyzer: Arc<AnalyzeContentHandler>) -> Self {
        Self {
            extractor,
            analyzer,
        }
    }

    pub async fn handle(&self, cmd: AnalyzeFileCommand) -> Result<AnalysisOutcome, DomainError> {
        let file_name = cmd.upload.file_name.clone();
        let text = self.extractor.extract(&cmd.upload).map_err(|err| {
            tracing::warn!(
                file_name = file_name.as_deref().unwrap_or("<unnamed>"),
                bytes = cmd.upload.bytes.len(),
                error = %err,
                "file extraction failed"
            );
            DomainError::from(err)
        })?;

        let command = AnalyzeContentCommand::text(text, cmd.settings)
            .with_source(SourceKind::File, file_name);
        self.analyzer.handle(command).await
    }
}
