//! Risk Module - Categories, scoring and results.
//!
//! Everything here is pure: the classifier's reply comes in as text and
//! leaves as a [`RiskResult`]. No I/O.
//!
//! # Components
//!
//! - `RiskCategory` - The six weighted categories
//! - `AggregateRiskScorer` - Validates sub-scores and computes the weighted aggregate
//! - `ModelAssessment` - Recovers the JSON assessment from a model reply
//! - `RiskResult` / `RiskLevel` - The presented outcome
//! - `BatchSummary` - Statistics over several results

mod assessment;
mod category;
mod level;
mod result;
mod scorer;
mod summary;

pub use assessment::{AssessmentParseError, ModelAssessment};
pub use category::RiskCategory;
pub use level::{RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use result::{
    CategoryScore, RiskResult, DEFAULT_EXPLANATION, EMPTY_CONTENT_EXPLANATION,
    EMPTY_CONTENT_RECOMMENDATION,
};
pub use scorer::{AggregateRiskScorer, ScoredCategories, ScoringWarning, SubScores};
pub use summary::BatchSummary;
