//! The six fixed risk categories and their weights.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed bucket of content concerns with a fixed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    IdentityDiscrimination,
    PoliticalSensitivity,
    SocialIssues,
    ProfessionalAppropriateness,
    PlatformViolations,
    TimingContext,
}

impl RiskCategory {
    /// All categories in presentation order. Weights sum to 100.
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::IdentityDiscrimination,
        RiskCategory::PoliticalSensitivity,
        RiskCategory::SocialIssues,
        RiskCategory::ProfessionalAppropriateness,
        RiskCategory::PlatformViolations,
        RiskCategory::TimingContext,
    ];

    /// Display label, also the key the model is asked to use.
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::IdentityDiscrimination => "Identity & Discrimination",
            RiskCategory::PoliticalSensitivity => "Political Sensitivity",
            RiskCategory::SocialIssues => "Social Issues",
            RiskCategory::ProfessionalAppropriateness => "Professional Appropriateness",
            RiskCategory::PlatformViolations => "Platform Violations",
            RiskCategory::TimingContext => "Timing & Context",
        }
    }

    /// Weight in whole percent.
    pub fn weight_percent(&self) -> u8 {
        match self {
            RiskCategory::IdentityDiscrimination => 25,
            RiskCategory::PoliticalSensitivity => 20,
            RiskCategory::SocialIssues => 20,
            RiskCategory::ProfessionalAppropriateness => 15,
            RiskCategory::PlatformViolations => 10,
            RiskCategory::TimingContext => 10,
        }
    }

    /// Weight as a fraction of 1.0.
    pub fn weight(&self) -> f64 {
        f64::from(self.weight_percent()) / 100.0
    }

    /// Position in [`RiskCategory::ALL`].
    pub fn index(&self) -> usize {
        match self {
            RiskCategory::IdentityDiscrimination => 0,
            RiskCategory::PoliticalSensitivity => 1,
            RiskCategory::SocialIssues => 2,
            RiskCategory::ProfessionalAppropriateness => 3,
            RiskCategory::PlatformViolations => 4,
            RiskCategory::TimingContext => 5,
        }
    }

    /// Criteria listed under the category in the prompt.
    pub fn criteria(&self) -> &'static [&'static str] {
        match self {
            RiskCategory::IdentityDiscrimination => &[
                "Content targeting protected characteristics",
                "Use of offensive language or slurs",
                "Discriminatory statements or stereotypes",
                "Exclusionary language",
            ],
            RiskCategory::PoliticalSensitivity => &[
                "Extreme political positions",
                "Conspiracy theories or misinformation",
                "Election-related false claims",
                "Polarizing political rhetoric",
            ],
            RiskCategory::SocialIssues => &[
                "Controversial takes on current events",
                "Dismissing social movements",
                "Insensitive commentary on sensitive topics",
                "Tone-deaf responses to crises",
            ],
            RiskCategory::ProfessionalAppropriateness => &[
                "Workplace conduct violations",
                "Industry ethics concerns",
                "Employer conflicts",
                "Unprofessional behavior",
            ],
            RiskCategory::PlatformViolations => &[
                "Harassment or bullying",
                "Doxxing or privacy violations",
                "Terms of service violations",
                "Spam or manipulative behavior",
            ],
            RiskCategory::TimingContext => &[
                "Insensitive timing of posts",
                "Trending topic risks",
                "Anniversary date considerations",
                "Current event sensitivity",
            ],
        }
    }

    /// Resolves a category from a loosely formatted name.
    ///
    /// Case, punctuation and a joining `&`/`and` are ignored, so
    /// `"Identity & Discrimination"`, `"identity_and_discrimination"` and
    /// `"IdentityDiscrimination"` all resolve to the same category.
    pub fn from_label(name: &str) -> Option<Self> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|category| normalize_name(category.label()) == wanted)
    }
}

fn normalize_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len());
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() && prev_lower {
            spaced.push(' ');
        }
        prev_lower = c.is_lowercase();
        spaced.push(c);
    }

    spaced
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|word| !word.is_empty() && word != "and")
        .collect()
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: u32 = RiskCategory::ALL
            .iter()
            .map(|c| u32::from(c.weight_percent()))
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, category) in RiskCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn from_label_accepts_display_labels() {
        for category in RiskCategory::ALL {
            assert_eq!(RiskCategory::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn from_label_tolerates_formatting_variants() {
        assert_eq!(
            RiskCategory::from_label("identity_and_discrimination"),
            Some(RiskCategory::IdentityDiscrimination)
        );
        assert_eq!(
            RiskCategory::from_label("TIMING AND CONTEXT"),
            Some(RiskCategory::TimingContext)
        );
        assert_eq!(
            RiskCategory::from_label("ProfessionalAppropriateness"),
            Some(RiskCategory::ProfessionalAppropriateness)
        );
        assert_eq!(
            RiskCategory::from_label("  social-issues "),
            Some(RiskCategory::SocialIssues)
        );
    }

    #[test]
    fn from_label_rejects_unknown_names() {
        assert_eq!(RiskCategory::from_label("Spelling"), None);
        assert_eq!(RiskCategory::from_label(""), None);
        assert_eq!(RiskCategory::from_label("&"), None);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&RiskCategory::TimingContext).unwrap();
        assert_eq!(json, "\"timing_context\"");
    }
}
