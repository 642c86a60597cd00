//! HTTP DTOs for analysis endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::{AnalysisOutcome, BatchAnalysisOutcome, ContentSummary, ProviderStatus};
use crate::domain::content::PageContext;
use crate::domain::foundation::DomainError;
use crate::domain::risk::{BatchSummary, CategoryScore, RiskResult, ScoringWarning};
use crate::domain::settings::{AnalysisSettings, AudienceSize, AuthorType, Platform, Sensitivity};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Analysis settings as sent by clients. Every field is optional.
///
/// Sensitivity arrives as a plain integer so that out-of-range values
/// become a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsDto {
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub author_type: Option<AuthorType>,
    #[serde(default)]
    pub audience_size: Option<AudienceSize>,
    #[serde(default)]
    pub sensitivity: Option<i64>,
}

impl SettingsDto {
    pub fn into_settings(self) -> Result<AnalysisSettings, DomainError> {
        let mut settings = AnalysisSettings::default();
        if let Some(platform) = self.platform {
            settings = settings.with_platform(platform);
        }
        if let Some(author_type) = self.author_type {
            settings = settings.with_author_type(author_type);
        }
        if let Some(audience_size) = self.audience_size {
            settings = settings.with_audience_size(audience_size);
        }
        if let Some(sensitivity) = self.sensitivity {
            settings = settings.with_sensitivity(Sensitivity::try_new(sensitivity)?);
        }
        Ok(settings)
    }
}

/// Converts optional settings, using defaults when absent.
pub fn settings_or_default(settings: Option<SettingsDto>) -> Result<AnalysisSettings, DomainError> {
    settings.unwrap_or_default().into_settings()
}

/// POST /api/analyze/text
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeTextRequest {
    pub content: String,
    #[serde(default)]
    pub settings: Option<SettingsDto>,
}

/// POST /api/analyze/url
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeUrlRequest {
    pub url: String,
    #[serde(default)]
    pub settings: Option<SettingsDto>,
    #[serde(default)]
    pub include_page_context: bool,
}

/// POST /api/analyze/batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub items: Vec<String>,
    #[serde(default)]
    pub settings: Option<SettingsDto>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One category row of the breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScoreResponse {
    pub category: String,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl From<&CategoryScore> for CategoryScoreResponse {
    fn from(score: &CategoryScore) -> Self {
        Self {
            category: score.category.label().to_string(),
            score: score.score,
            weight: score.weight,
            contribution: score.contribution,
        }
    }
}

/// Scored result of one piece of content.
#[derive(Debug, Clone, Serialize)]
pub struct RiskResultResponse {
    pub analysis_id: String,
    pub risk_percentage: u8,
    pub risk_level: String,
    pub aggregate_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_percentage: Option<u8>,
    pub categories: Vec<CategoryScoreResponse>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub explanation: String,
    pub warnings: Vec<ScoringWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub analyzed_at: String,
    pub cached: bool,
}

impl From<RiskResult> for RiskResultResponse {
    fn from(result: RiskResult) -> Self {
        Self {
            analysis_id: result.analysis_id.to_string(),
            risk_percentage: result.risk_percentage.value(),
            risk_level: result.risk_level.label().to_string(),
            aggregate_score: result.aggregate_score,
            reported_percentage: result.reported_percentage.map(|p| p.value()),
            categories: result.categories.iter().map(CategoryScoreResponse::from).collect(),
            risk_factors: result.risk_factors,
            recommendations: result.recommendations,
            explanation: result.explanation,
            warnings: result.warnings,
            model: result.model,
            analyzed_at: result.analyzed_at.as_datetime().to_rfc3339(),
            cached: result.cached,
        }
    }
}

/// Response for single-content analysis endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub result: RiskResultResponse,
    pub content: ContentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_context: Option<PageContext>,
}

impl From<AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            result: outcome.result.into(),
            content: outcome.content,
            page_context: outcome.page_context,
        }
    }
}

/// One entry of a batch response.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResponse {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RiskResultResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

/// Response for POST /api/analyze/batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalysisResponse {
    pub results: Vec<BatchItemResponse>,
    pub summary: BatchSummary,
}

impl From<BatchAnalysisOutcome> for BatchAnalysisResponse {
    fn from(outcome: BatchAnalysisOutcome) -> Self {
        let results = outcome
            .items
            .into_iter()
            .map(|item| match item.result {
                Ok(result) => BatchItemResponse {
                    index: item.index,
                    result: Some(result.into()),
                    error: None,
                },
                Err(err) => BatchItemResponse {
                    index: item.index,
                    result: None,
                    error: Some(ErrorResponse {
                        error_code: err.error_code,
                        message: err.message,
                        details: None,
                    }),
                },
            })
            .collect();

        Self {
            results,
            summary: outcome.summary,
        }
    }
}

/// Response for GET /api/status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub provider: ProviderStatus,
}

impl From<ProviderStatus> for StatusResponse {
    fn from(provider: ProviderStatus) -> Self {
        Self {
            status: if provider.connected { "ok" } else { "degraded" },
            provider,
        }
    }
}

/// Response for GET /health.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        let details = (!err.details.is_empty()).then(|| {
            serde_json::Value::Object(
                err.details
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            )
        });

        Self {
            error_code: err.code.to_string(),
            message: err.message.clone(),
            details,
        }
    }
}
