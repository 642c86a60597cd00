//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `content` - Normalized input text and page context
//! - `settings` - Platform, author, audience and sensitivity options
//! - `prompt` - Classifier prompt construction
//! - `risk` - Categories, aggregate scoring and results

pub mod content;
pub mod foundation;
pub mod prompt;
pub mod risk;
pub mod settings;
