//! Aggregate statistics over a batch of results.

use serde::{Deserialize, Serialize};

use super::{RiskLevel, RiskResult};

/// Counts and averages over several analyses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_items: usize,
    /// Mean risk percentage, one decimal place.
    pub average_risk: f64,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    /// Share of High results in percent, one decimal place.
    pub high_risk_percentage: f64,
}

impl BatchSummary {
    /// Summarizes results. An empty slice yields an all-zero summary.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a RiskResult>) -> Self {
        let mut summary = Self::default();
        let mut total_risk = 0.0;

        for result in results {
            summary.total_items += 1;
            total_risk += f64::from(result.risk_percentage.value());
            match result.risk_level {
                RiskLevel::High => summary.high_risk_count += 1,
                RiskLevel::Medium => summary.medium_risk_count += 1,
                RiskLevel::Low => summary.low_risk_count += 1,
            }
        }

        if summary.total_items > 0 {
            let total = summary.total_items as f64;
            summary.average_risk = round_one_decimal(total_risk / total);
            summary.high_risk_percentage =
                round_one_decimal(summary.high_risk_count as f64 / total * 100.0);
        }
        summary
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
