//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    /// Creates a new random AnalysisId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnalysisId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_id_new_is_unique() {
        assert_ne!(AnalysisId::new(), AnalysisId::new());
    }

    #[test]
    fn analysis_id_parses_its_display_form() {
        let id = AnalysisId::new();
        let parsed: AnalysisId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn analysis_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<AnalysisId>().is_err());
    }
}
