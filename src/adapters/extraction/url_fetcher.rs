//! URL content fetcher backed by reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

use super::file::decode_text;
use super::html::{extract_main_text, extract_page_context};
use crate::domain::content::collapse_whitespace;
use crate::ports::{ContentFetcher, ExtractionError, FetchedPage};

/// Sites tend to serve bots differently, so we look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Largest response body read when no other limit is configured.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Parses a user-supplied URL, accepting only http(s) with a host.
pub fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(raw.trim()).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractionError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ExtractionError::InvalidUrl("missing host".to_string()));
    }
    Ok(url)
}

/// Fetches pages over HTTP and extracts their text.
pub struct HttpContentFetcher {
    client: Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpContentFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Caps the number of body bytes read from a page.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    fn map_error(&self, err: reqwest::Error) -> ExtractionError {
        if err.is_timeout() {
            ExtractionError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ExtractionError::Fetch(err.to_string())
        }
    }

    /// Reads the body chunk by chunk, stopping once it passes the limit.
    async fn read_body(&self, mut response: reqwest::Response) -> Result<Vec<u8>, ExtractionError> {
        let limit = self.max_body_bytes;
        if let Some(declared) = response.content_length() {
            let declared = usize::try_from(declared).unwrap_or(usize::MAX);
            if declared > limit {
                return Err(ExtractionError::TooLarge {
                    size: declared,
                    limit,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if body.len() + chunk.len() > limit {
                return Err(ExtractionError::TooLarge {
                    size: body.len() + chunk.len(),
                    limit,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(
        &self,
        url: &str,
        include_page_context: bool,
    ) -> Result<FetchedPage, ExtractionError> {
        let url = validate_url(url)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = decode_text(&self.read_body(response).await?);

        tracing::debug!(
            url = %final_url,
            content_type = %content_type,
            bytes = body.len(),
            "fetched page"
        );

        if content_type.contains("text/html") {
            let text = extract_main_text(&body)?;
            let page_context = include_page_context
                .then(|| extract_page_context(&body, &final_url))
                .filter(|context| !context.is_empty());
            Ok(FetchedPage {
                url: final_url.to_string(),
                text,
                page_context,
            })
        } else if content_type.contains("text/plain") {
            Ok(FetchedPage {
                url: final_url.to_string(),
                text: collapse_whitespace(&body),
                page_context: None,
            })
        } else {
            let shown = if content_type.is_empty() {
                "unknown".to_string()
            } else {
                content_type
            };
            Err(ExtractionError::UnsupportedContentType(shown))
        }
    }
}
