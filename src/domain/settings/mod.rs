//! Settings module - user-chosen analysis context.

mod options;

pub use options::{AudienceSize, AuthorType, Platform, Sensitivity};

use serde::{Deserialize, Serialize};

/// Flat record of the options that shape the prompt.
///
/// Serializes deterministically, which the result cache relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub author_type: AuthorType,
    #[serde(default)]
    pub audience_size: AudienceSize,
    #[serde(default)]
    pub sensitivity: Sensitivity,
}

impl AnalysisSettings {
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_author_type(mut self, author_type: AuthorType) -> Self {
        self.author_type = author_type;
        self
    }

    pub fn with_audience_size(mut self, audience_size: AudienceSize) -> Self {
        self.audience_size = audience_size;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }
}
