//! Reports whether the completion API is reachable.

use serde::Serialize;
use std::sync::Arc;

use crate::ports::AIProvider;

/// Connectivity of the configured provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub provider: String,
    pub primary_model: String,
    pub fallback_model: Option<String>,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct CheckProviderHandler {
    provider: Arc<dyn AIProvider>,
}

impl CheckProviderHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Never fails; a provider error is reported in the status instead.
    pub async fn handle(&self) -> ProviderStatus {
        let info = self.provider.provider_info();
        let (connected, error) = match self.provider.health_check().await {
            Ok(()) => (true, None),
            Err(err) => {
                tracing::warn!(provider = %info.name, error = %err, "provider connectivity check failed");
                (false, Some(err.to_string()))
            }
        };

        ProviderStatus {
            provider: info.name,
            primary_model: info.model,
            fallback_model: info.fallback_model,
            connected,
            error,
        }
    }
}
