//! Completion API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Plain environment variable consulted when no prefixed key is set.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Upper bound on `max_retries`; backoff doubles per retry.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// Completion API configuration (Groq or any OpenAI-compatible endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the completion endpoint
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Larger model used first
    #[serde(default = "default_primary_model")]
    pub primary_model: String,

    /// Smaller model used when the primary fails
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries per model on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Completion token budget for an analysis
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Fill a missing key from the given lookup (normally `GROQ_API_KEY`).
    pub fn with_key_fallback(mut self, lookup: impl FnOnce() -> Option<String>) -> Self {
        if !self.has_api_key() {
            self.api_key = lookup().filter(|k| !k.trim().is_empty());
        }
        self
    }

    /// Validate completion API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("GROQ_API_KEY"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.primary_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__PRIMARY_MODEL"));
        }
        if self.fallback_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__FALLBACK_MODEL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ValidationError::TooManyRetries(MAX_RETRIES_LIMIT));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::ZeroLimit("max_tokens"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_primary_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_fallback_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    1
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.3
}
