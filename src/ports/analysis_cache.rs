//! Analysis cache port.
//!
//! Identical content analyzed with identical settings yields the same
//! prompt, so the previous result can be served without a remote call.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::domain::content::PageContext;
use crate::domain::risk::RiskResult;
use crate::domain::settings::AnalysisSettings;

/// Port for storing finished analyses.
#[async_trait]
pub trait AnalysisCache: Send + Sync {
    /// Returns the stored result, if present and not expired.
    async fn get(&self, key: &CacheKey) -> Option<RiskResult>;

    /// Stores a result, evicting older entries as needed.
    async fn put(&self, key: CacheKey, result: RiskResult);

    /// Number of live entries.
    async fn len(&self) -> usize;
}

/// SHA-256 hex digest identifying one prompt's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key from normalized content, settings and page context.
    pub fn compute(
        content: &str,
        settings: &AnalysisSettings,
        page_context: Option<&PageContext>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hasher.update([0x1f]);
        hasher.update(serde_json::to_vec(settings).unwrap_or_default());
        hasher.update([0x1f]);
        if let Some(context) = page_context {
            hasher.update(serde_json::to_vec(context).unwrap_or_default());
        }
        let digest = hasher.finalize();
        Self(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::PageMetadata;
    use crate::domain::settings::{Platform, Sensitivity};

    #[test]
    fn key_is_hex_sha256() {
        let key = CacheKey::compute("hello", &AnalysisSettings::default(), None);
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn identical_inputs_share_a_key() {
        let settings = AnalysisSettings::default().with_platform(Platform::Twitter);
        assert_eq!(
            CacheKey::compute("same text", &settings, None),
            CacheKey::compute("same text", &settings, None)
        );
    }

    #[test]
    fn settings_and_context_change_the_key() {
        let base = CacheKey::compute("text", &AnalysisSettings::default(), None);

        let stricter = AnalysisSettings::default()
            .with_sensitivity(Sensitivity::try_new(9).unwrap());
        assert_ne!(base, CacheKey::compute("text", &stricter, None));

        let context = PageContext {
            metadata: PageMetadata {
                title: Some("Title".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_ne!(
            base,
            CacheKey::compute("text", &AnalysisSettings::default(), Some(&context))
        );
    }
}
