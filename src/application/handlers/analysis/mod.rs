//! Analysis handlers.
//!
//! Single content, URL, file and batch analysis, plus the provider check.

mod analyze_content;
mod analyze_source;
mod batch_analyze;
mod check_provider;

pub use analyze_content::{
    AnalysisOptions, AnalysisOutcome, AnalyzeContentCommand, AnalyzeContentHandler, ContentSummary,
};
pub use analyze_source::{AnalyzeFileCommand, AnalyzeFileHandler, AnalyzeUrlCommand, AnalyzeUrlHandler};
pub use batch_analyze::{
    BatchAnalysisOutcome, BatchAnalyzeCommand, BatchAnalyzeHandler, BatchItemError, BatchItemOutcome,
};
pub use check_provider::{CheckProviderHandler, ProviderStatus};
