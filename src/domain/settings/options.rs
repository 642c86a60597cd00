//! Enumerated analysis options.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Where the content will be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    #[serde(alias = "linked_in")]
    LinkedIn,
    Instagram,
    Facebook,
    #[serde(alias = "you_tube")]
    YouTube,
    #[serde(alias = "tik_tok")]
    TikTok,
    #[default]
    General,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Instagram,
        Platform::Facebook,
        Platform::YouTube,
        Platform::TikTok,
        Platform::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::General => "General",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Who is posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorType {
    #[default]
    Individual,
    PublicFigure,
    Corporate,
    Influencer,
    Journalist,
    Politician,
}

impl AuthorType {
    pub const ALL: [AuthorType; 6] = [
        AuthorType::Individual,
        AuthorType::PublicFigure,
        AuthorType::Corporate,
        AuthorType::Influencer,
        AuthorType::Journalist,
        AuthorType::Politician,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AuthorType::Individual => "Individual",
            AuthorType::PublicFigure => "Public Figure",
            AuthorType::Corporate => "Corporate",
            AuthorType::Influencer => "Influencer",
            AuthorType::Journalist => "Journalist",
            AuthorType::Politician => "Politician",
        }
    }
}

impl fmt::Display for AuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Follower count band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AudienceSize {
    #[default]
    #[serde(rename = "under_1k")]
    Under1K,
    #[serde(rename = "1k_10k")]
    From1KTo10K,
    #[serde(rename = "10k_100k")]
    From10KTo100K,
    #[serde(rename = "100k_1m")]
    From100KTo1M,
    #[serde(rename = "over_1m")]
    Over1M,
}

impl AudienceSize {
    pub fn label(&self) -> &'static str {
        match self {
            AudienceSize::Under1K => "< 1K followers",
            AudienceSize::From1KTo10K => "1K - 10K followers",
            AudienceSize::From10KTo100K => "10K - 100K followers",
            AudienceSize::From100KTo1M => "100K - 1M followers",
            AudienceSize::Over1M => "> 1M followers",
        }
    }
}

impl fmt::Display for AudienceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Strictness dial passed to the classifier, 1 (lenient) to 10 (strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Sensitivity(u8);

impl Sensitivity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: u8 = 5;

    /// Creates a sensitivity, rejecting values outside 1..=10.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(ValidationError::out_of_range(
                "sensitivity",
                i32::from(Self::MIN),
                i32::from(Self::MAX),
                value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<i64> for Sensitivity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Sensitivity> for u8 {
    fn from(value: Sensitivity) -> Self {
        value.0
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_deserializes_lowercase_and_aliases() {
        let p: Platform = serde_json::from_str("\"linkedin\"").unwrap();
        assert_eq!(p, Platform::LinkedIn);
        let p: Platform = serde_json::from_str("\"tik_tok\"").unwrap();
        assert_eq!(p, Platform::TikTok);
        assert!(serde_json::from_str::<Platform>("\"myspace\"").is_err());
    }

    #[test]
    fn author_type_uses_snake_case() {
        let a: AuthorType = serde_json::from_str("\"public_figure\"").unwrap();
        assert_eq!(a, AuthorType::PublicFigure);
        assert_eq!(a.label(), "Public Figure");
    }

    #[test]
    fn audience_size_round_trips_band_names() {
        let a: AudienceSize = serde_json::from_str("\"100k_1m\"").unwrap();
        assert_eq!(a, AudienceSize::From100KTo1M);
        assert_eq!(serde_json::to_string(&AudienceSize::Under1K).unwrap(), "\"under_1k\"");
        assert_eq!(AudienceSize::Over1M.label(), "> 1M followers");
    }

    #[test]
    fn defaults_match_a_private_individual() {
        assert_eq!(Platform::default(), Platform::General);
        assert_eq!(AuthorType::default(), AuthorType::Individual);
        assert_eq!(AudienceSize::default(), AudienceSize::Under1K);
        assert_eq!(Sensitivity::default().value(), 5);
    }

    #[test]
    fn sensitivity_accepts_bounds() {
        assert_eq!(Sensitivity::try_new(1).unwrap().value(), 1);
        assert_eq!(Sensitivity::try_new(10).unwrap().value(), 10);
        assert_eq!(Sensitivity::try_new(7).unwrap().to_string(), "7/10");
    }

    #[test]
    fn sensitivity_rejects_out_of_range() {
        assert!(matches!(
            Sensitivity::try_new(0),
            Err(ValidationError::OutOfRange { actual: 0, .. })
        ));
        assert!(Sensitivity::try_new(11).is_err());
        assert!(Sensitivity::try_new(-3).is_err());
        assert!(serde_json::from_str::<Sensitivity>("42").is_err());
    }
}
