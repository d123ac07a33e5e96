use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scout::judgment::LlmJudgment;

/// Qualitative strength label attached to an accepted record. Unrecognised
/// labels read as `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    #[serde(other)]
    Medium,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(label)
    }
}

/// Terminal artifact of the validation pipeline. Only accepted candidates
/// produce one; it is never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub company: String,
    pub website: String,
    /// Non-empty for every accepted record.
    pub reasons: Vec<String>,
    pub evidence: Vec<String>,
    /// One to three role-search strings.
    pub outreach_searches: Vec<String>,
    pub confidence: Confidence,
    pub llm_judgment: Option<LlmJudgment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"high\"");
        let c: Confidence = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(c, Confidence::Low);
    }

    #[test]
    fn test_confidence_accepts_capitalized_labels() {
        let c: Confidence = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(c, Confidence::Medium);
    }

    #[test]
    fn test_confidence_unknown_label_is_medium() {
        let c: Confidence = serde_json::from_str("\"very high\"").unwrap();
        assert_eq!(c, Confidence::Medium);
    }

    #[test]
    fn test_confidence_default_is_medium() {
        assert_eq!(Confidence::default(), Confidence::Medium);
        assert_eq!(Confidence::default().to_string(), "medium");
    }
}
