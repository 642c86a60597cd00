//! Failover AI Provider - Wrapper that falls back to a second model.
//!
//! When the primary model fails with a transient error (rate limit,
//! unavailable) or has been retired, the fallback is tried once.
//!
//! # Example
//!
//! ```ignore
//! let primary = GroqProvider::new(config.clone().with_model("llama-3.1-70b-versatile"))?;
//! let fallback = GroqProvider::new(config.with_model("llama-3.1-8b-instant"))?;
//!
//! let provider = FailoverAIProvider::new(primary)
//!     .with_fallback(fallback);
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI events for usage and failover monitoring.
pub mod events {
    use serde::{Deserialize, Serialize};

    use crate::domain::foundation::{AnalysisId, Timestamp};

    /// Emitted when a completion succeeds.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CompletionRecorded {
        pub analysis_id: AnalysisId,
        pub provider: String,
        pub model: String,
        pub prompt_tokens: u32,
        pub completion_tokens: u32,
        pub trace_id: String,
        pub occurred_at: Timestamp,
    }

    impl CompletionRecorded {
        pub fn new(
            analysis_id: AnalysisId,
            provider: impl Into<String>,
            model: impl Into<String>,
            prompt_tokens: u32,
            completion_tokens: u32,
            trace_id: impl Into<String>,
        ) -> Self {
            Self {
                analysis_id,
                provider: provider.into(),
                model: model.into(),
                prompt_tokens,
                completion_tokens,
                trace_id: trace_id.into(),
                occurred_at: Timestamp::now(),
            }
        }

        /// Total tokens used in this request.
        pub fn total_tokens(&self) -> u32 {
            self.prompt_tokens + self.completion_tokens
        }
    }

    /// Emitted when the fallback model is tried.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelFallback {
        pub analysis_id: AnalysisId,
        pub primary_model: String,
        pub fallback_model: String,
        pub reason: String,
        pub occurred_at: Timestamp,
    }

    impl ModelFallback {
        pub fn new(
            analysis_id: AnalysisId,
            primary: impl Into<String>,
            fallback: impl Into<String>,
            reason: impl Into<String>,
        ) -> Self {
            Self {
                analysis_id,
                primary_model: primary.into(),
                fallback_model: fallback.into(),
                reason: reason.into(),
                occurred_at: Timestamp::now(),
            }
        }
    }
}

/// Callback for receiving AI events (completions, failover).
pub trait AIEventCallback: Send + Sync {
    /// Called when a completion succeeds.
    fn on_completion(&self, event: events::CompletionRecorded);

    /// Called when the fallback model is tried.
    fn on_fallback(&self, event: events::ModelFallback);
}

/// Writes AI events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventCallback;

impl AIEventCallback for TracingEventCallback {
    fn on_completion(&self, event: events::CompletionRecorded) {
        tracing::info!(
            analysis_id = %event.analysis_id,
            provider = %event.provider,
            model = %event.model,
            prompt_tokens = event.prompt_tokens,
            completion_tokens = event.completion_tokens,
            total_tokens = event.total_tokens(),
            trace_id = %event.trace_id,
            "completion recorded"
        );
    }

    fn on_fallback(&self, event: events::ModelFallback) {
        tracing::warn!(
            analysis_id = %event.analysis_id,
            primary_model = %event.primary_model,
            fallback_model = %event.fallback_model,
            reason = %event.reason,
            "primary model failed, using fallback"
        );
    }
}

/// AI provider wrapper with automatic failover support.
///
/// Wraps a primary provider and optionally a fallback provider.
/// On transient failures or a retired primary model, the fallback is tried.
pub struct FailoverAIProvider<P: AIProvider, F: AIProvider = NoFallback> {
    primary: P,
    fallback: Option<F>,
    event_callback: Arc<dyn AIEventCallback>,
}

/// Marker type for when no fallback is configured.
pub struct NoFallback;

#[async_trait]
impl AIProvider for NoFallback {
    async fn complete(&self, _: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::unavailable("no fallback model configured"))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("none", "none", 0)
    }
}

impl<P: AIProvider> FailoverAIProvider<P, NoFallback> {
    /// Creates a new failover provider with only a primary provider.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: None,
            event_callback: Arc::new(TracingEventCallback),
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback<F: AIProvider>(self, fallback: F) -> FailoverAIProvider<P, F> {
        FailoverAIProvider {
            primary: self.primary,
            fallback: Some(fallback),
            event_callback: self.event_callback,
        }
    }
}

impl<P: AIProvider, F: AIProvider> FailoverAIProvider<P, F> {
    /// Sets the event callback for receiving AI events.
    pub fn with_event_callback(mut self, callback: Arc<dyn AIEventCallback>) -> Self {
        self.event_callback = callback;
        self
    }

    fn emit_completion(
        &self,
        provider: &ProviderInfo,
        request: &CompletionRequest,
        response: &CompletionResponse,
    ) {
        let event = events::CompletionRecorded::new(
            request.metadata.analysis_id,
            &provider.name,
            &response.model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            &request.metadata.trace_id,
        );
        self.event_callback.on_completion(event);
    }

    fn emit_fallback(&self, fallback: &F, request: &CompletionRequest, reason: &str) {
        let event = events::ModelFallback::new(
            request.metadata.analysis_id,
            self.primary.provider_info().model,
            fallback.provider_info().model,
            reason,
        );
        self.event_callback.on_fallback(event);
    }
}

#[async_trait]
impl<P: AIProvider + 'static, F: AIProvider + 'static> AIProvider for FailoverAIProvider<P, F> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        match self.primary.complete(request.clone()).await {
            Ok(response) => {
                self.emit_completion(&self.primary.provider_info(), &request, &response);
                Ok(response)
            }
            Err(err) if err.warrants_fallback() => match self.fallback.as_ref() {
                Some(fallback) => {
                    self.emit_fallback(fallback, &request, &err.to_string());
                    let response = fallback.complete(request.clone()).await?;
                    self.emit_completion(&fallback.provider_info(), &request, &response);
                    Ok(response)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Checks the fallback model when there is one; it is the cheaper call.
    async fn health_check(&self) -> Result<(), AIError> {
        match self.fallback.as_ref() {
            Some(fallback) => fallback.health_check().await,
            None => self.primary.health_check().await,
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        let info = self.primary.provider_info();
        match self.fallback.as_ref() {
            Some(fallback) => info.with_fallback_model(fallback.provider_info().model),
            None => info,
        }
    }
}
