//! BatchAnalyzeHandler - Scores several texts with shared settings.
//!
//! Items run one after another. A failing item is reported in place and
//! does not fail the batch.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::risk::{BatchSummary, RiskResult};
use crate::domain::settings::AnalysisSettings;

use super::analyze_content::{AnalyzeContentCommand, AnalyzeContentHandler};

/// Command to analyze a list of texts.
#[derive(Debug, Clone)]
pub struct BatchAnalyzeCommand {
    pub items: Vec<String>,
    pub settings: AnalysisSettings,
}

/// Failure of one batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItemError {
    pub error_code: String,
    pub message: String,
}

impl From<DomainError> for BatchItemError {
    fn from(err: DomainError) -> Self {
        Self {
            error_code: err.code.to_string(),
            message: err.message,
        }
    }
}

/// Outcome of one batch item.
#[derive(Debug, Clone)]
pub struct BatchItemOutcome {
    /// Position in the request.
    pub index: usize,
    pub result: Result<RiskResult, BatchItemError>,
}

/// Result of a batch.
#[derive(Debug, Clone)]
pub struct BatchAnalysisOutcome {
    pub items: Vec<BatchItemOutcome>,
    /// Statistics over the successful items.
    pub summary: BatchSummary,
}

pub struct BatchAnalyzeHandler {
    analyzer: Arc<AnalyzeContentHandler>,
    max_items: usize,
}

impl BatchAnalyzeHandler {
    pub fn new(analyzer: Arc<AnalyzeContentHandler>, max_items: usize) -> Self {
        Self {
            analyzer,
            max_items,
        }
    }

    pub async fn handle(&self, cmd: BatchAnalyzeCommand) -> Result<BatchAnalysisOutcome, DomainError> {
        if cmd.items.len() > self.max_items {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Batch accepts at most {} items", self.max_items),
            )
            .with_detail("field", "items")
            .with_detail("max_items", self.max_items.to_string()));
        }

        tracing::info!(items = cmd.items.len(), "starting batch analysis");

        let mut items = Vec::with_capacity(cmd.items.len());
        for (index, content) in cmd.items.into_iter().enumerate() {
            let result = self
                .analyzer
                .handle(AnalyzeContentCommand::text(content, cmd.settings))
                .await
                .map(|outcome| outcome.result)
                .map_err(|err| {
                    tracing::warn!(index, error = %err, "batch item failed");
                    BatchItemError::from(err)
                });
            items.push(BatchItemOutcome { index, result });
        }

        let summary = BatchSummary::from_results(items.iter().filter_map(|i| i.result.as_ref().ok()));
        tracing::info!(
            analyzed = summary.total_items,
            failed = items.len() - summary.total_items,
            average_risk = summary.average_risk,
            "batch analysis complete"
        );

        Ok(BatchAnalysisOutcome { items, summary })
    }
}
