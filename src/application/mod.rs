//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AnalysisOptions, AnalysisOutcome, AnalyzeContentCommand, AnalyzeContentHandler,
    AnalyzeFileCommand, AnalyzeFileHandler, AnalyzeUrlCommand, AnalyzeUrlHandler,
    BatchAnalysisOutcome, BatchAnalyzeCommand, BatchAnalyzeHandler, BatchItemError,
    BatchItemOutcome, CheckProviderHandler, ContentSummary, ProviderStatus,
};
