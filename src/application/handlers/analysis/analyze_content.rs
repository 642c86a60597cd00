//! AnalyzeContentHandler - Scores one piece of text.
//!
//! Pipeline: normalize, short-circuit empty input, consult the cache,
//! build the prompt, call the provider once, parse, aggregate locally.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::content::{ContentItem, PageContext, SourceKind};
use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode};
use crate::domain::prompt::{build_analysis_prompt, PromptInput, SYSTEM_PROMPT};
use crate::domain::risk::{ModelAssessment, RiskResult};
use crate::domain::settings::AnalysisSettings;
use crate::ports::{
    AIProvider, AnalysisCache, CacheKey, CompletionRequest, MessageRole, RequestMetadata,
};

/// Tunables for the analysis call.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Characters of normalized content sent to the model.
    pub max_content_chars: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_content_chars: 4000,
            max_tokens: 1500,
            temperature: 0.3,
        }
    }
}

/// Command to analyze text that is already in hand.
#[derive(Debug, Clone)]
pub struct AnalyzeContentCommand {
    pub content: String,
    pub source: SourceKind,
    /// File name or URL.
    pub label: Option<String>,
    pub settings: AnalysisSettings,
    /// Images and metadata of a fetched page.
    pub page_context: Option<PageContext>,
}

impl AnalyzeContentCommand {
    pub fn text(content: impl Into<String>, settings: AnalysisSettings) -> Self {
        Self {
            content: content.into(),
            source: SourceKind::Text,
            label: None,
            settings,
            page_context: None,
        }
    }

    pub fn with_source(mut self, source: SourceKind, label: Option<String>) -> Self {
        self.source = source;
        self.label = label;
        self
    }

    pub fn with_page_context(mut self, page_context: Option<PageContext>) -> Self {
        self.page_context = page_context;
        self
    }
}

/// What was actually analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSummary {
    pub source: SourceKind,
    pub label: Option<String>,
    /// Characters before normalization.
    pub original_length: usize,
    /// Characters sent to the model.
    pub analyzed_length: usize,
    pub truncated: bool,
}

impl ContentSummary {
    fn of(item: &ContentItem) -> Self {
        Self {
            source: item.source(),
            label: item.label().map(String::from),
            original_length: item.original_length(),
            analyzed_length: item.text().chars().count(),
            truncated: item.is_truncated(),
        }
    }
}

/// Result of one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: RiskResult,
    pub content: ContentSummary,
    pub page_context: Option<PageContext>,
}

/// Handler for single-content analysis.
pub struct AnalyzeContentHandler {
    provider: Arc<dyn AIProvider>,
    cache: Arc<dyn AnalysisCache>,
    options: AnalysisOptions,
}

impl AnalyzeContentHandler {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        cache: Arc<dyn AnalysisCache>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            provider,
            cache,
            options,
        }
    }

    pub async fn handle(&self, cmd: AnalyzeContentCommand) -> Result<AnalysisOutcome, DomainError> {
        let mut item = ContentItem::new(&cmd.content, cmd.source, self.options.max_content_chars);
        if let Some(label) = cmd.label {
            item = item.with_label(label);
        }
        let summary = ContentSummary::of(&item);

        if item.is_empty() {
            tracing::info!(source = %item.source(), "empty content, skipping remote analysis");
            return Ok(AnalysisOutcome {
                result: RiskResult::empty_content(),
                content: summary,
                page_context: cmd.page_context,
            });
        }

        let key = CacheKey::compute(item.text(), &cmd.settings, cmd.page_context.as_ref());
        if let Some(result) = self.cache.get(&key).await {
            tracing::debug!(cache_key = %key, analysis_id = %result.analysis_id, "analysis cache hit");
            return Ok(AnalysisOutcome {
                result,
                content: summary,
                page_context: cmd.page_context,
            });
        }

        let visual_context = cmd.page_context.as_ref().and_then(PageContext::summary);
        let prompt = build_analysis_prompt(PromptInput {
            content: item.text(),
            settings: &cmd.settings,
            visual_context: visual_context.as_deref(),
        });

        let analysis_id = AnalysisId::new();
        let request = CompletionRequest::new(RequestMetadata::new(
            analysis_id,
            analysis_id.to_string(),
        ))
        .with_system_prompt(SYSTEM_PROMPT)
        .with_message(MessageRole::User, prompt)
        .with_max_tokens(self.options.max_tokens)
        .with_temperature(self.options.temperature)
        .with_json_response();

        tracing::info!(
            analysis_id = %analysis_id,
            source = %item.source(),
            chars = summary.analyzed_length,
            truncated = summary.truncated,
            platform = cmd.settings.platform.label(),
            "requesting risk assessment"
        );

        let response = self.provider.complete(request).await.map_err(|err| {
            tracing::warn!(analysis_id = %analysis_id, error = %err, "risk assessment failed");
            DomainError::from(err)
        })?;

        let assessment = ModelAssessment::parse(&response.content).map_err(|err| {
            tracing::warn!(analysis_id = %analysis_id, error = %err, "unparseable model reply");
            DomainError::new(ErrorCode::ResponseParseFailed, err.to_string())
                .with_detail("model", response.model.clone())
        })?;

        let mut result = RiskResult::from_assessment(assessment, response.model);
        result.analysis_id = analysis_id;

        for warning in &result.warnings {
            tracing::warn!(analysis_id = %analysis_id, %warning, "scoring warning");
        }
        tracing::info!(
            analysis_id = %analysis_id,
            risk_percentage = result.risk_percentage.value(),
            risk_level = result.risk_level.label(),
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "analysis complete"
        );

        self.cache.put(key, result.clone()).await;

        Ok(AnalysisOutcome {
            result,
            content: summary,
            page_context: cmd.page_context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::cache::{InMemoryAnalysisCache, NoopAnalysisCache};
    use crate::domain::content::PageMetadata;
    use crate::domain::risk::{RiskCategory, RiskLevel, ScoringWarning};
    use crate::domain::settings::Platform;
    use crate::ports::ResponseFormat;
    use std::time::Duration;

    const REPLY: &str = r#"{
        "risk_percentage": 60,
        "risk_level": "Medium",
        "categories": {
            "Identity & Discrimination": 80,
            "Political Sensitivity": 60,
            "Social Issues": 40,
            "Professional Appropriateness": 20,
            "Platform Violations": 0,
            "Timing & Context": 100
        },
        "risk_factors": ["Divisive framing"],
        "recommendations": ["Soften the tone"],
        "explanation": "Touches on elections."
    }"#;

    fn handler(provider: MockAIProvider) -> AnalyzeContentHandler {
        AnalyzeContentHandler::new(
            Arc::new(provider),
            Arc::new(InMemoryAnalysisCache::new(16, Duration::from_secs(60))),
            AnalysisOptions::default(),
        )
    }

    fn command(text: &str) -> AnalyzeContentCommand {
        AnalyzeContentCommand::text(text, AnalysisSettings::default())
    }

    #[tokio::test]
    async fn scores_locally_from_model_categories() {
        let provider = MockAIProvider::new().with_response(REPLY);
        let outcome = handler(provider).handle(command("Vote for change!")).await.unwrap();

        let result = outcome.result;
        assert_eq!(result.risk_percentage.value(), 53);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.reported_percentage.map(|p| p.value()), Some(60));
        assert_eq!(result.risk_factors, vec!["Divisive framing".to_string()]);
        assert_eq!(result.explanation, "Touches on elections.");
        assert_eq!(result.model.as_deref(), Some("mock-model-1"));
        assert!(!result.cached);
        assert_eq!(
            result.category(RiskCategory::IdentityDiscrimination).map(|c| c.score),
            Some(80.0)
        );
    }

    #[tokio::test]
    async fn sends_one_json_mode_request_with_system_prompt() {
        let provider = MockAIProvider::new().with_response(REPLY);
        let settings = AnalysisSettings::default().with_platform(Platform::LinkedIn);
        handler(provider.clone())
            .handle(AnalyzeContentCommand::text("Hello   world", settings))
            .await
            .unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.system_prompt.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(request.response_format, ResponseFormat::JsonObject);
        assert_eq!(request.max_tokens, Some(1500));
        assert_eq!(request.temperature, Some(0.3));
        let prompt = request.last_user_message().unwrap();
        assert!(prompt.contains("\"Hello world\""));
        assert!(prompt.contains("LINKEDIN GUIDELINES:"));
    }

    #[tokio::test]
    async fn empty_content_skips_the_provider() {
        let provider = MockAIProvider::new();
        let outcome = handler(provider.clone()).handle(command("   \n\t ")).await.unwrap();

        assert_eq!(provider.call_count(), 0);
        assert_eq!(outcome.result.risk_percentage.value(), 0);
        assert_eq!(outcome.result.risk_level, RiskLevel::Low);
        assert_eq!(outcome.result.categories.len(), 6);
        assert_eq!(outcome.content.original_length, 6);
        assert_eq!(outcome.content.analyzed_length, 0);
    }

    #[tokio::test]
    async fn long_content_is_truncated_before_prompting() {
        let provider = MockAIProvider::new().with_response(REPLY);
        let text = "word ".repeat(2000);
        let outcome = handler(provider).handle(command(&text)).await.unwrap();

        assert!(outcome.content.truncated);
        assert_eq!(outcome.content.original_length, 10_000);
        assert!(outcome.content.analyzed_length <= 4000);
    }

    #[tokio::test]
    async fn identical_request_is_served_from_cache() {
        let provider = MockAIProvider::new().with_response(REPLY);
        let handler = handler(provider.clone());

        let first = handler.handle(command("Same post")).await.unwrap();
        let second = handler.handle(command("Same  post ")).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert!(!first.result.cached);
        assert!(second.result.cached);
        assert_eq!(first.result.analysis_id, second.result.analysis_id);
    }

    #[tokio::test]
    async fn different_settings_miss_the_cache() {
        let provider = MockAIProvider::new().with_response(REPLY).with_response(REPLY);
        let handler = handler(provider.clone());

        handler.handle(command("Same post")).await.unwrap();
        let stricter = AnalysisSettings::default().with_platform(Platform::TikTok);
        handler
            .handle(AnalyzeContentCommand::text("Same post", stricter))
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let provider = MockAIProvider::new()
            .with_error(MockError::AuthenticationFailed)
            .with_response(REPLY);
        let handler = handler(provider.clone());

        assert!(handler.handle(command("Post")).await.is_err());
        let retry = handler.handle(command("Post")).await.unwrap();

        assert!(!retry.result.cached);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited_code() {
        let provider = MockAIProvider::new().with_error(MockError::RateLimited { retry_after_secs: 9 });
        let err = handler(provider).handle(command("Post")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::RateLimited);
    }

    #[tokio::test]
    async fn unparseable_reply_is_an_error() {
        let provider = MockAIProvider::new().with_response("I cannot help with that.");
        let err = handler(provider).handle(command("Post")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ResponseParseFailed);
    }

    #[tokio::test]
    async fn missing_categories_default_to_zero_with_warnings() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"categories": {"Identity & Discrimination": 100}}"#);
        let outcome = handler(provider).handle(command("Post")).await.unwrap();

        let result = outcome.result;
        assert_eq!(result.risk_percentage.value(), 25);
        assert_eq!(
            result
                .warnings
                .iter()
                .filter(|w| matches!(w, ScoringWarning::MissingCategory { .. }))
                .count(),
            5
        );
    }

    #[tokio::test]
    async fn page_context_reaches_the_prompt() {
        let provider = MockAIProvider::new().with_response(REPLY);
        let context = PageContext {
            metadata: PageMetadata {
                title: Some("Breaking story".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        handler(provider.clone())
            .handle(command("Article body").with_page_context(Some(context)))
            .await
            .unwrap();

        let prompt = provider.get_calls()[0].last_user_message().unwrap().to_string();
        assert!(prompt.contains("VISUAL CONTEXT:"));
        assert!(prompt.contains("Page Title: Breaking story"));
    }

    #[tokio::test]
    async fn works_without_a_cache() {
        let provider = MockAIProvider::new().with_response(REPLY).with_response(REPLY);
        let handler = AnalyzeContentHandler::new(
            Arc::new(provider.clone()),
            Arc::new(NoopAnalysisCache),
            AnalysisOptions::default(),
        );

        handler.handle(command("Post")).await.unwrap();
        handler.handle(command("Post")).await.unwrap();

        assert_eq!(provider.call_count(), 2);
    }
}
