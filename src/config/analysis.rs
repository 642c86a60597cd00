//! Analysis pipeline configuration (input limits and result cache)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Analysis pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Characters of normalized content sent to the model
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Whether identical analyses are served from memory
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Maximum cached analyses
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Cached analysis lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// URL fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Most items accepted in one batch request
    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,
}

impl AnalysisConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Validate analysis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_content_chars == 0 {
            return Err(ValidationError::ZeroLimit("max_content_chars"));
        }
        if self.cache_enabled && self.cache_capacity == 0 {
            return Err(ValidationError::ZeroLimit("cache_capacity"));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_upload_bytes == 0 {
            return Err(ValidationError::ZeroLimit("max_upload_bytes"));
        }
        if self.max_batch_items == 0 {
            return Err(ValidationError::ZeroLimit("max_batch_items"));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            cache_enabled: default_cache_enabled(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
            max_batch_items: default_max_batch_items(),
        }
    }
}

fn default_max_content_chars() -> usize {
    4000
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    128
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_batch_items() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_config_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_content_chars, 4000);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_batch_items, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_only_matters_with_cache_enabled() {
        let config = AnalysisConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            cache_enabled: false,
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_content_limit_rejected() {
        let config = AnalysisConfig {
            max_content_chars: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroLimit("max_content_chars"))
        ));
    }
}
