//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GroqProvider` - Groq (or any OpenAI-compatible) chat completions
//! - `FailoverAIProvider` - Wrapper that falls back to a second model
//! - `MockAIProvider` - Configurable mock for testing

mod failover_provider;
mod groq_provider;
mod mock_provider;

pub use failover_provider::{
    events as ai_events, AIEventCallback, FailoverAIProvider, NoFallback, TracingEventCallback,
};
pub use groq_provider::{GroqConfig, GroqProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
