//! The per-request risk result.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnalysisId, Percentage, Timestamp};

use super::{
    AggregateRiskScorer, ModelAssessment, RiskCategory, RiskLevel, ScoredCategories,
    ScoringWarning, SubScores,
};

/// Explanation used when the model gives none.
pub const DEFAULT_EXPLANATION: &str = "Analysis completed successfully.";

/// Recommendation returned for content with nothing to analyze.
pub const EMPTY_CONTENT_RECOMMENDATION: &str = "Content is empty or too short to analyze";

/// Explanation returned for content with nothing to analyze.
pub const EMPTY_CONTENT_EXPLANATION: &str = "No meaningful content to analyze.";

/// One category's line in the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: RiskCategory,
    /// Sub-score in [0, 100].
    pub score: f64,
    /// Weight as a fraction of 1.0.
    pub weight: f64,
    /// score × weight.
    pub contribution: f64,
}

impl CategoryScore {
    pub fn new(category: RiskCategory, score: f64) -> Self {
        Self {
            category,
            score,
            weight: category.weight(),
            contribution: AggregateRiskScorer::contribution(category, score),
        }
    }
}

/// Outcome of one analysis. Always carries all six categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub analysis_id: AnalysisId,
    pub categories: Vec<CategoryScore>,
    /// Weighted aggregate in [0, 100].
    pub aggregate_score: f64,
    /// Aggregate rounded to a whole percent.
    pub risk_percentage: Percentage,
    pub risk_level: RiskLevel,
    /// Overall figure the model claimed, kept for comparison only.
    pub reported_percentage: Option<Percentage>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub explanation: String,
    pub warnings: Vec<ScoringWarning>,
    pub model: Option<String>,
    pub analyzed_at: Timestamp,
    pub cached: bool,
}

impl RiskResult {
    /// Builds a result from validated sub-scores.
    pub fn from_scores(scored: ScoredCategories) -> Self {
        let ScoredCategories { scores, warnings } = scored;
        let aggregate_score = AggregateRiskScorer::aggregate(&scores);
        let risk_percentage = Percentage::from_score(aggregate_score);

        Self {
            analysis_id: AnalysisId::new(),
            categories: breakdown(&scores),
            aggregate_score,
            risk_percentage,
            risk_level: RiskLevel::from_percentage(risk_percentage),
            reported_percentage: None,
            risk_factors: Vec::new(),
            recommendations: Vec::new(),
            explanation: DEFAULT_EXPLANATION.to_string(),
            warnings,
            model: None,
            analyzed_at: Timestamp::now(),
            cached: false,
        }
    }

    /// Builds a result from a parsed classifier reply.
    pub fn from_assessment(assessment: ModelAssessment, model: impl Into<String>) -> Self {
        let scored = AggregateRiskScorer::score_categories(assessment.categories.as_ref());

        let mut result = Self::from_scores(scored);
        result.reported_percentage = assessment.reported_percentage.map(Percentage::from_score);
        result.risk_factors = assessment.risk_factors;
        result.recommendations = assessment.recommendations;
        if let Some(explanation) = assessment.explanation {
            result.explanation = explanation;
        }
        result.model = Some(model.into());
        result
    }

    /// Zero-risk result for content that normalizes to nothing.
    pub fn empty_content() -> Self {
        let mut result = Self::from_scores(ScoredCategories::default());
        result.recommendations = vec![EMPTY_CONTENT_RECOMMENDATION.to_string()];
        result.explanation = EMPTY_CONTENT_EXPLANATION.to_string();
        result
    }

    /// Marks the result as served from the cache.
    pub fn into_cached(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Looks up one category line.
    pub fn category(&self, category: RiskCategory) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }
}

fn breakdown(scores: &SubScores) -> Vec<CategoryScore> {
    scores
        .iter()
        .map(|(category, score)| CategoryScore::new(category, score))
        .collect()
}
