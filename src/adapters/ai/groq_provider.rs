//! Groq Provider - Implementation of AIProvider for Groq's OpenAI-compatible API.
//!
//! Any endpoint speaking the OpenAI chat completions protocol works by
//! overriding the base URL.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(api_key)
//!     .with_model("llama-3.1-70b-versatile")
//!     .with_base_url("https://api.groq.com/openai/v1");
//!
//! let provider = GroqProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, ResponseFormat, TokenUsage,
};

/// Seconds to wait when a rate limit response carries no hint.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Backoff stops doubling after this many retries (32s).
const MAX_BACKOFF_EXPONENT: u32 = 5;

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "llama-3.1-70b-versatile").
    pub model: String,
    /// Base URL for the API (default: https://api.groq.com/openai/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GroqConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.1-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 1,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Groq API provider implementation.
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to the wire format.
    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(ChatMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: match request.response_format {
                ResponseFormat::JsonObject => Some(ChatResponseFormat {
                    kind: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        }
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let chat_request = self.to_chat_request(request);

        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = Self::retry_after_header(response.headers());
        let error_body = response.text().await.unwrap_or_default();

        Err(self.map_error_status(status, retry_after, &error_body))
    }

    /// Maps a failed status and body to an error.
    fn map_error_status(
        &self,
        status: StatusCode,
        retry_after: Option<u32>,
        error_body: &str,
    ) -> AIError {
        match status.as_u16() {
            401 | 403 => AIError::AuthenticationFailed,
            404 => AIError::model_unavailable(&self.config.model),
            429 => AIError::rate_limited(
                retry_after.unwrap_or_else(|| Self::parse_retry_after(error_body)),
            ),
            400 if error_body.contains("model_decommissioned")
                || error_body.contains("model_not_found") =>
            {
                AIError::model_unavailable(&self.config.model)
            }
            400 if error_body.contains("maximum context length")
                || error_body.contains("context_length_exceeded") =>
            {
                AIError::ContextTooLong
            }
            400 => AIError::InvalidRequest(error_body.to_string()),
            500..=599 => AIError::unavailable(format!("Server error {}: {}", status, error_body)),
            _ => AIError::network(format!("Unexpected status {}: {}", status, error_body)),
        }
    }

    /// Reads a whole-seconds `Retry-After` header.
    fn retry_after_header(headers: &HeaderMap) -> Option<u32> {
        headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(|secs| secs.ceil().max(1.0) as u32)
    }

    /// Parses retry-after from an error message like "Please try again in 7.5s".
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            });

        if let Some(msg) = message {
            if let Some(idx) = msg.find("try again in ") {
                let rest = &msg[idx + 13..];
                let end = rest
                    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .unwrap_or(rest.len());
                if let Ok(secs) = rest[..end].parse::<f64>() {
                    return secs.ceil().max(1.0) as u32;
                }
            }
        }
        DEFAULT_RETRY_AFTER_SECS
    }

    /// Parses a successful response.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        let usage = chat_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: chat_response.model.unwrap_or_else(|| self.config.model.clone()),
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for GroqProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut last_error = AIError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            let attempt = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match attempt {
                Ok(completion) => return Ok(completion),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        model = %self.config.model,
                        attempt = retry_count + 1,
                        error = %err,
                        "completion failed, retrying"
                    );
                    last_error = err;
                }
            }

            sleep(backoff_delay(retry_count)).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        let max_context = match self.config.model.as_str() {
            m if m.starts_with("llama-3.1") || m.starts_with("llama-3.3") => 131_072,
            m if m.starts_with("mixtral") => 32_768,
            _ => 8_192,
        };

        ProviderInfo::new("groq", &self.config.model, max_context)
    }
}

// ----- Chat Completions API Types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ChatResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Exponential backoff: 1s, 2s, 4s, ... capped at 32s.
fn backoff_delay(retry_count: u32) -> Duration {
    Duration::from_secs(1u64 << retry_count.min(MAX_BACKOFF_EXPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AnalysisId;
    use crate::ports::RequestMetadata;
    use reqwest::header::HeaderValue;

    fn provider() -> GroqProvider {
        GroqProvider::new(GroqConfig::new("test-key")).unwrap()
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(5), Duration::from_secs(32));
        assert_eq!(backoff_delay(64), Duration::from_secs(32));
    }

    #[test]
    fn config_builder_works() {
        let config = GroqConfig::new("test-key")
            .with_model("llama-3.1-8b-instant")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(3);

        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let provider =
            GroqProvider::new(GroqConfig::new("k").with_base_url("https://api.groq.com/openai/v1/"))
                .unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn request_includes_system_prompt_and_json_format() {
        let request = CompletionRequest::new(RequestMetadata::new(AnalysisId::new(), "t"))
            .with_system_prompt("Always respond with valid JSON.")
            .with_message(MessageRole::User, "Analyze this")
            .with_max_tokens(1500)
            .with_temperature(0.3)
            .with_json_response();

        let wire = serde_json::to_value(provider().to_chat_request(&request)).unwrap();

        assert_eq!(wire["model"], "llama-3.1-70b-versatile");
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][1]["content"], "Analyze this");
        assert_eq!(wire["max_tokens"], 1500);
        assert_eq!(wire["response_format"]["type"], "json_object");
    }

    #[test]
    fn text_request_omits_response_format() {
        let request = CompletionRequest::new(RequestMetadata::new(AnalysisId::new(), "t"))
            .with_message(MessageRole::User, "Test");

        let wire = serde_json::to_value(provider().to_chat_request(&request)).unwrap();
        assert!(wire.get("response_format").is_none());
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn status_mapping() {
        let p = provider();
        assert!(matches!(
            p.map_error_status(StatusCode::UNAUTHORIZED, None, ""),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            p.map_error_status(StatusCode::FORBIDDEN, None, ""),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            p.map_error_status(StatusCode::NOT_FOUND, None, ""),
            AIError::ModelUnavailable { .. }
        ));
        assert!(matches!(
            p.map_error_status(StatusCode::TOO_MANY_REQUESTS, Some(12), ""),
            AIError::RateLimited { retry_after_secs: 12 }
        ));
        assert!(matches!(
            p.map_error_status(StatusCode::BAD_GATEWAY, None, "upstream"),
            AIError::Unavailable { .. }
        ));
    }

    #[test]
    fn decommissioned_model_is_unavailable() {
        let body = r#"{"error":{"message":"The model has been decommissioned","code":"model_decommissioned"}}"#;
        let err = provider().map_error_status(StatusCode::BAD_REQUEST, None, body);
        assert!(err.warrants_fallback());
        assert!(matches!(err, AIError::ModelUnavailable { .. }));
    }

    #[test]
    fn context_length_is_not_retryable() {
        let body = r#"{"error":{"code":"context_length_exceeded"}}"#;
        let err = provider().map_error_status(StatusCode::BAD_REQUEST, None, body);
        assert!(matches!(err, AIError::ContextTooLong));
        assert!(!err.warrants_fallback());
    }

    #[test]
    fn retry_after_header_wins_over_body() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("4"));
        assert_eq!(GroqProvider::retry_after_header(&headers), Some(4));
        assert_eq!(GroqProvider::retry_after_header(&HeaderMap::new()), None);
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit reached. Please try again in 7.66s."}}"#;
        assert_eq!(GroqProvider::parse_retry_after(error), 8);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(GroqProvider::parse_retry_after(error), DEFAULT_RETRY_AFTER_SECS);
    }

    #[test]
    fn provider_info_reports_context_window() {
        let info = provider().provider_info();
        assert_eq!(info.name, "groq");
        assert_eq!(info.model, "llama-3.1-70b-versatile");
        assert_eq!(info.max_context_tokens, 131_072);
    }
}
