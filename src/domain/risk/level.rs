//! Risk level bands over the aggregate percentage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Percentage;

/// Aggregate at or above this is High.
pub const HIGH_RISK_THRESHOLD: u8 = 70;

/// Aggregate at or above this (and below High) is Medium.
pub const MEDIUM_RISK_THRESHOLD: u8 = 40;

/// Coarse risk band shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bands a rounded aggregate percentage.
    pub fn from_percentage(percentage: Percentage) -> Self {
        match percentage.value() {
            v if v >= HIGH_RISK_THRESHOLD => RiskLevel::High,
            v if v >= MEDIUM_RISK_THRESHOLD => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_at_thresholds() {
        assert_eq!(RiskLevel::from_percentage(Percentage::new(0)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(Percentage::new(39)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(Percentage::new(40)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_percentage(Percentage::new(69)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_percentage(Percentage::new(70)), RiskLevel::High);
        assert_eq!(RiskLevel::from_percentage(Percentage::HUNDRED), RiskLevel::High);
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"Medium\"");
    }
}
