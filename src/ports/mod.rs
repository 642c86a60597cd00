//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Chat completion API that scores content
//! - `ContentFetcher` - Web page retrieval and text extraction
//! - `FileExtractor` - Text extraction from uploaded files
//! - `AnalysisCache` - Storage for finished analyses

mod ai_provider;
mod analysis_cache;
mod content_fetcher;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, ResponseFormat, TokenUsage,
    HEALTH_CHECK_MAX_TOKENS, HEALTH_CHECK_PROMPT,
};
pub use analysis_cache::{AnalysisCache, CacheKey};
pub use content_fetcher::{
    ContentFetcher, ExtractionError, FetchedPage, FileExtractor, UploadedFile,
};
