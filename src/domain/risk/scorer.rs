//! Aggregate Risk Scorer - Weighted combination of category sub-scores.
//!
//! The classifier is external, so its output is treated as untrusted data:
//! missing, non-numeric or out-of-range sub-scores never fail an analysis.
//! They are coerced into range and reported as [`ScoringWarning`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::RiskCategory;

/// Lowest valid sub-score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest valid sub-score.
pub const MAX_SCORE: f64 = 100.0;

/// One sub-score per category, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubScores([f64; 6]);

impl SubScores {
    /// All categories at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builds scores in [`RiskCategory::ALL`] order, clamping each value.
    pub fn from_array(values: [f64; 6]) -> Self {
        Self(values.map(clamp_score))
    }

    /// Sets one category, clamping into range.
    pub fn set(&mut self, category: RiskCategory, score: f64) {
        self.0[category.index()] = clamp_score(score);
    }

    pub fn get(&self, category: RiskCategory) -> f64 {
        self.0[category.index()]
    }

    /// Iterates categories with their scores in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, f64)> + '_ {
        RiskCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// A data-quality problem found while reading classifier sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringWarning {
    /// The classifier returned no `categories` object at all.
    CategoriesMissing,
    /// A category was absent; scored as 0.
    MissingCategory { category: RiskCategory },
    /// A category had a value that is not a finite number; scored as 0.
    NonNumeric { category: RiskCategory, value: String },
    /// A category was outside [0, 100]; clamped.
    OutOfRange {
        category: RiskCategory,
        value: f64,
        clamped_to: f64,
    },
    /// The same category appeared twice; the first value was kept.
    DuplicateCategory { category: RiskCategory },
    /// A key that matches no known category; ignored.
    UnknownCategory { name: String },
}

impl fmt::Display for ScoringWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringWarning::CategoriesMissing => {
                write!(f, "Classifier returned no category scores; all categories scored as 0")
            }
            ScoringWarning::MissingCategory { category } => {
                write!(f, "Missing score for '{}'; scored as 0", category)
            }
            ScoringWarning::NonNumeric { category, value } => {
                write!(f, "Non-numeric score {} for '{}'; scored as 0", value, category)
            }
            ScoringWarning::OutOfRange {
                category,
                value,
                clamped_to,
            } => write!(
                f,
                "Score {} for '{}' is outside 0-100; clamped to {}",
                value, category, clamped_to
            ),
            ScoringWarning::DuplicateCategory { category } => {
                write!(f, "Duplicate score for '{}'; first value kept", category)
            }
            ScoringWarning::UnknownCategory { name } => {
                write!(f, "Unknown category '{}' ignored", name)
            }
        }
    }
}

/// Sub-scores read from a classifier response, plus what went wrong reading them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoredCategories {
    pub scores: SubScores,
    pub warnings: Vec<ScoringWarning>,
}

/// Pure calculator for the aggregate risk score.
pub struct AggregateRiskScorer;

impl AggregateRiskScorer {
    /// Computes Σ(sub-score × weight), clamped to [0, 100].
    ///
    /// Weights are applied in whole percent and divided once at the end,
    /// so integral inputs produce exact results.
    pub fn aggregate(scores: &SubScores) -> f64 {
        let weighted: f64 = scores
            .iter()
            .map(|(category, score)| clamp_score(score) * f64::from(category.weight_percent()))
            .sum();
        clamp_score(weighted / 100.0)
    }

    /// Weighted contribution of one category to the aggregate.
    pub fn contribution(category: RiskCategory, score: f64) -> f64 {
        clamp_score(score) * f64::from(category.weight_percent()) / 100.0
    }

    /// Reads sub-scores from the classifier's `categories` value.
    ///
    /// # Edge Cases
    /// - `None` or a non-object: every category scored 0, one warning each
    /// - Numeric strings (`"80"`) and `{"score": 80}` objects are accepted
    /// - NaN, infinities, booleans, arrays: scored 0 with a warning
    /// - Out-of-range numbers: clamped with a warning
    pub fn score_categories(raw: Option<&Value>) -> ScoredCategories {
        let mut scores = SubScores::zero();
        let mut warnings = Vec::new();
        let mut seen = [false; 6];

        match raw {
            Some(Value::Object(map)) => {
                for (name, value) in map {
                    let Some(category) = RiskCategory::from_label(name) else {
                        warnings.push(ScoringWarning::UnknownCategory { name: name.clone() });
                        continue;
                    };
                    if seen[category.index()] {
                        warnings.push(ScoringWarning::DuplicateCategory { category });
                        continue;
                    }
                    seen[category.index()] = true;

                    match numeric_score(value) {
                        Some(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => {
                            scores.set(category, score);
                        }
                        Some(score) => {
                            let clamped_to = clamp_score(score);
                            warnings.push(ScoringWarning::OutOfRange {
                                category,
                                value: score,
                                clamped_to,
                            });
                            scores.set(category, clamped_to);
                        }
                        None => {
                            warnings.push(ScoringWarning::NonNumeric {
                                category,
                                value: value.to_string(),
                            });
                        }
                    }
                }
            }
            _ => warnings.push(ScoringWarning::CategoriesMissing),
        }

        for category in RiskCategory::ALL {
            if !seen[category.index()] {
                warnings.push(ScoringWarning::MissingCategory { category });
            }
        }

        ScoredCategories { scores, warnings }
    }
}

/// Clamps into [0, 100]. NaN becomes 0.
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return MIN_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Extracts a finite number from a classifier value.
fn numeric_score(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        Value::Object(map) => map.get("score").and_then(numeric_score),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
