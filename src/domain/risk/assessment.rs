//! Reading the classifier's reply into a structured assessment.
//!
//! Models are asked for a bare JSON object but routinely wrap it in code
//! fences or prose. The object is located first, then each field is read
//! leniently. Category scores are left raw for [`AggregateRiskScorer`].
//!
//! [`AggregateRiskScorer`]: super::AggregateRiskScorer

use serde_json::Value;
use thiserror::Error;

/// Maximum accepted reply length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum characters kept per free-text field.
pub const MAX_FIELD_CHARS: usize = 1_000;

/// Maximum entries kept per list field.
pub const MAX_LIST_ITEMS: usize = 10;

/// Errors that make a reply unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssessmentParseError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("No JSON object found in model response")]
    NoJsonObject,

    #[error("JSON parse error: {0}")]
    InvalidJson(String),
}

/// Fields read from the classifier reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelAssessment {
    /// Raw `categories` value, validated later by the scorer.
    pub categories: Option<Value>,
    /// The model's own overall percentage, if it gave a usable one.
    pub reported_percentage: Option<f64>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub explanation: Option<String>,
}

impl ModelAssessment {
    /// Parses a raw completion into an assessment.
    ///
    /// # Errors
    ///
    /// Fails only when no JSON object can be recovered. Bad field values
    /// are dropped rather than rejected.
    pub fn parse(response: &str) -> Result<Self, AssessmentParseError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(AssessmentParseError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let json = extract_json_object(response).ok_or(AssessmentParseError::NoJsonObject)?;
        let value: Value = serde_json::from_str(json)
            .map_err(|e| AssessmentParseError::InvalidJson(e.to_string()))?;
        let Value::Object(mut map) = value else {
            return Err(AssessmentParseError::NoJsonObject);
        };

        Ok(Self {
            categories: map.remove("categories").filter(|v| !v.is_null()),
            reported_percentage: map.get("risk_percentage").and_then(read_number),
            risk_factors: map.get("risk_factors").map(read_list).unwrap_or_default(),
            recommendations: map.get("recommendations").map(read_list).unwrap_or_default(),
            explanation: map
                .get("explanation")
                .and_then(Value::as_str)
                .map(clean_text)
                .filter(|s| !s.is_empty()),
        })
    }
}

/// Locates the JSON object in a reply: fenced block first, then the first
/// balanced `{...}` span.
fn extract_json_object(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if let Some(block) = extract_from_code_block(trimmed) {
        if block.starts_with('{') {
            return Some(block);
        }
    }

    let start = trimmed.find('{')?;
    extract_balanced_object(trimmed, start)
}

fn extract_from_code_block(s: &str) -> Option<&str> {
    let patterns = ["```json\n", "```json\r\n", "```JSON\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let body_start = start + pattern.len();
            if let Some(end) = s[body_start..].find("```") {
                return Some(s[body_start..body_start + end].trim());
            }
        }
    }
    None
}

fn extract_balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn read_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn read_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    };

    items
        .iter()
        .map(|s| clean_text(s))
        .filter(|s| !s.is_empty())
        .take(MAX_LIST_ITEMS)
        .collect()
}

/// Strips markup and control characters, collapses whitespace, caps length.
fn clean_text(s: &str) -> String {
    let mut no_tags = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => no_tags.push(' '),
            c => no_tags.push(c),
        }
    }

    let collapsed = no_tags.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_FIELD_CHARS {
        let truncated: String = collapsed.chars().take(MAX_FIELD_CHARS).collect();
        format!("{}...", truncated)
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "risk_percentage": 35,
        "risk_level": "Low",
        "categories": {"Identity & Discrimination": 10, "Political Sensitivity": 60},
        "risk_factors": ["Mentions an election", "  "],
        "recommendations": ["Add context"],
        "explanation": "Mostly harmless."
    }"#;

    #[test]
    fn parses_plain_json() {
        let assessment = ModelAssessment::parse(FULL).unwrap();

        assert_eq!(assessment.reported_percentage, Some(35.0));
        assert_eq!(assessment.risk_factors, vec!["Mentions an election"]);
        assert_eq!(assessment.recommendations, vec!["Add context"]);
        assert_eq!(assessment.explanation.as_deref(), Some("Mostly harmless."));
        assert!(assessment.categories.unwrap().is_object());
    }

    #[test]
    fn parses_json_in_code_block() {
        let response = format!("Here is my analysis:\n```json\n{}\n```\nLet me know!", FULL);
        let assessment = ModelAssessment::parse(&response).unwrap();
        assert_eq!(assessment.reported_percentage, Some(35.0));
    }

    #[test]
    fn parses_json_after_preamble() {
        let response = r#"Sure! {"risk_percentage": "42%", "explanation": "uses {braces} in text"} trailing"#;
        let assessment = ModelAssessment::parse(response).unwrap();

        assert_eq!(assessment.reported_percentage, Some(42.0));
        assert_eq!(assessment.explanation.as_deref(), Some("uses {braces} in text"));
        assert_eq!(assessment.categories, None);
    }

    #[test]
    fn tolerates_multibyte_text_before_json() {
        let response = "Analyse terminée ✓ {\"risk_percentage\": 5}";
        let assessment = ModelAssessment::parse(response).unwrap();
        assert_eq!(assessment.reported_percentage, Some(5.0));
    }

    #[test]
    fn string_list_field_becomes_single_item() {
        let response = r#"{"risk_factors": "One <b>bold</b> claim", "recommendations": 7}"#;
        let assessment = ModelAssessment::parse(response).unwrap();

        assert_eq!(assessment.risk_factors, vec!["One bold claim"]);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn list_fields_are_capped() {
        let items: Vec<String> = (0..25).map(|i| format!("\"factor {}\"", i)).collect();
        let response = format!("{{\"risk_factors\": [{}]}}", items.join(","));
        let assessment = ModelAssessment::parse(&response).unwrap();
        assert_eq!(assessment.risk_factors.len(), MAX_LIST_ITEMS);
    }

    #[test]
    fn long_explanation_is_truncated() {
        let response = format!("{{\"explanation\": \"{}\"}}", "a".repeat(MAX_FIELD_CHARS + 50));
        let assessment = ModelAssessment::parse(&response).unwrap();
        let explanation = assessment.explanation.unwrap();
        assert!(explanation.ends_with("..."));
        assert_eq!(explanation.chars().count(), MAX_FIELD_CHARS + 3);
    }

    #[test]
    fn non_finite_or_textual_percentage_is_ignored() {
        let assessment = ModelAssessment::parse(r#"{"risk_percentage": "high"}"#).unwrap();
        assert_eq!(assessment.reported_percentage, None);
    }

    #[test]
    fn reply_without_json_is_an_error() {
        assert_eq!(
            ModelAssessment::parse("I cannot help with that."),
            Err(AssessmentParseError::NoJsonObject)
        );
    }

    #[test]
    fn unterminated_json_is_an_error() {
        assert_eq!(
            ModelAssessment::parse(r#"{"risk_percentage": 10"#),
            Err(AssessmentParseError::NoJsonObject)
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ModelAssessment::parse(r#"{"risk_percentage": 10,,}"#),
            Err(AssessmentParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn oversized_reply_is_rejected() {
        let response = "x".repeat(MAX_RESPONSE_LENGTH + 1);
        assert!(matches!(
            ModelAssessment::parse(&response),
            Err(AssessmentParseError::TooLong { .. })
        ));
    }
}
