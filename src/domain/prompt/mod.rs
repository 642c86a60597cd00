//! Prompt module - the classifier request text.

mod guidelines;
mod template;

pub use guidelines::{author_context, platform_guidelines};
pub use template::{build_analysis_prompt, PromptInput, SYSTEM_PROMPT};
