//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CANCEL_CHECKER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cancel_checker::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod analysis;
mod error;
mod server;

pub use ai::{AiConfig, GROQ_API_KEY_VAR};
pub use analysis::AnalysisConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so only the API key must be provided.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion API configuration (key, models, sampling)
    #[serde(default)]
    pub ai: AiConfig,

    /// Analysis pipeline configuration (limits, cache)
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CANCEL_CHECKER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    /// 5. Falls back to `GROQ_API_KEY` when no prefixed key is set
    ///
    /// # Environment Variable Format
    ///
    /// - `CANCEL_CHECKER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CANCEL_CHECKER__AI__PRIMARY_MODEL=...` -> `ai.primary_model = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CANCEL_CHECKER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.ai = config
            .ai
            .with_key_fallback(|| std::env::var(GROQ_API_KEY_VAR).ok());

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.analysis.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
