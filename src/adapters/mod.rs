//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (Groq, failover wrapper, mock)
//! - `extraction` - URL fetching and file text extraction
//! - `cache` - Analysis result caches
//! - `http` - The axum REST API

pub mod ai;
pub mod cache;
pub mod extraction;
pub mod http;
