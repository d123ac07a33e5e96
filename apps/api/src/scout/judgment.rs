//! LLM Judgment Adapter: asks the model for a qualitative partner-readiness
//! assessment of a company's homepage (and careers page, when fetched).
//!
//! An absent judgment means "no information". It is never a negative signal.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::llm_client::prompts::{fill_template, truncate_chars, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{parse_structured, Completion, Structured};
use crate::models::record::Confidence;
use crate::scout::prompts::{JUDGMENT_PROMPT_TEMPLATE, JUDGMENT_SYSTEM};

/// Context budget for the homepage excerpt, in characters.
pub const HOMEPAGE_CHAR_LIMIT: usize = 3000;
/// Context budget for the careers excerpt, in characters.
pub const CAREERS_CHAR_LIMIT: usize = 1500;

const JUDGMENT_MAX_TOKENS: u32 = 800;
const JUDGMENT_TEMPERATURE: f32 = 0.3;

/// How a company presents itself, as read by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Positioning {
    ConsultingFirst,
    EngineeringFirst,
    Balanced,
    #[default]
    #[serde(other)]
    Unclear,
}

impl fmt::Display for Positioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Positioning::ConsultingFirst => "consulting-first",
            Positioning::EngineeringFirst => "engineering-first",
            Positioning::Balanced => "balanced",
            Positioning::Unclear => "unclear",
        };
        f.write_str(label)
    }
}

/// Structured judgment returned by the model. Missing, `null` or unknown
/// values fall back to their defaults instead of discarding the judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmJudgment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_partner_ready: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: Confidence,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_signals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub red_flags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positioning: Positioning,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_focus: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Requests a judgment. Returns `None` when the capability is missing, the
/// call fails, or the reply cannot be decoded.
pub async fn judge(
    llm: Option<&dyn Completion>,
    company: &str,
    url: &str,
    homepage_text: &str,
    careers_text: Option<&str>,
) -> Option<LlmJudgment> {
    let llm = llm?;
    let prompt = build_judgment_prompt(company, url, homepage_text, careers_text);

    let raw = llm
        .complete(
            JUDGMENT_SYSTEM,
            &prompt,
            JUDGMENT_MAX_TOKENS,
            JUDGMENT_TEMPERATURE,
        )
        .await?;

    match parse_structured::<LlmJudgment>(&raw) {
        Structured::Parsed(judgment) => {
            debug!(
                company = %company,
                partner_ready = judgment.is_partner_ready,
                positioning = %judgment.positioning,
                "LLM judgment received"
            );
            Some(judgment)
        }
        Structured::Unparsed(_) => {
            warn!(company = %company, "Discarding unparsable LLM judgment");
            None
        }
    }
}

fn build_judgment_prompt(
    company: &str,
    url: &str,
    homepage_text: &str,
    careers_text: Option<&str>,
) -> String {
    let mut page_content = format!(
        "Homepage Content:\n{}",
        truncate_chars(homepage_text, HOMEPAGE_CHAR_LIMIT)
    );
    if let Some(text) = careers_text {
        page_content.push_str("\n\nCareers Page Content:\n");
        page_content.push_str(truncate_chars(text, CAREERS_CHAR_LIMIT));
    }

    fill_template(
        JUDGMENT_PROMPT_TEMPLATE,
        &[
            ("{company}", company),
            ("{url}", url),
            ("{page_content}", page_content.as_str()),
            ("{json_only}", JSON_ONLY_INSTRUCTION),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scout::testing::ScriptedLlm;

    const FULL_JUDGMENT: &str = r#"```json
    {
        "is_partner_ready": true,
        "confidence": "high",
        "key_signals": ["AWS partner", "case studies"],
        "red_flags": [],
        "positioning": "consulting-first",
        "partner_evidence": "Lists an alliance program",
        "outcome_focus": "Talks about ROI",
        "reasoning": "Clear consulting firm with partner program."
    }
    ```"#;

    #[test]
    fn test_judgment_deserializes_full_shape() {
        let judgment = match parse_structured::<LlmJudgment>(FULL_JUDGMENT) {
            Structured::Parsed(judgment) => judgment,
            Structured::Unparsed(raw) => panic!("unparsed judgment: {raw}"),
        };
        assert!(judgment.is_partner_ready);
        assert_eq!(judgment.confidence, Confidence::High);
        assert_eq!(judgment.positioning, Positioning::ConsultingFirst);
        assert_eq!(judgment.key_signals.len(), 2);
        assert_eq!(
            judgment.partner_evidence.as_deref(),
            Some("Lists an alliance program")
        );
    }

    #[test]
    fn test_judgment_defaults_optional_fields() {
        let judgment: LlmJudgment = serde_json::from_str(r#"{"is_partner_ready": false}"#).unwrap();
        assert_eq!(judgment.confidence, Confidence::Medium);
        assert_eq!(judgment.positioning, Positioning::Unclear);
        assert!(judgment.key_signals.is_empty());
        assert!(judgment.reasoning.is_empty());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let judgment: LlmJudgment = serde_json::from_str(
            r#"{"is_partner_ready": true, "confidence": null, "key_signals": null,
                "red_flags": null, "positioning": null, "partner_evidence": null,
                "reasoning": null}"#,
        )
        .unwrap();
        assert!(judgment.is_partner_ready);
        assert_eq!(judgment.confidence, Confidence::Medium);
        assert!(judgment.key_signals.is_empty());
        assert!(judgment.red_flags.is_empty());
        assert_eq!(judgment.positioning, Positioning::Unclear);
        assert!(judgment.reasoning.is_empty());
    }

    #[test]
    fn test_unknown_confidence_label_reads_as_medium() {
        let judgment: LlmJudgment = serde_json::from_str(
            r#"{"is_partner_ready": true, "confidence": "medium-high"}"#,
        )
        .unwrap();
        assert_eq!(judgment.confidence, Confidence::Medium);
    }

    #[tokio::test]
    async fn test_judge_keeps_reply_with_null_lists() {
        let llm = ScriptedLlm::replying(&[r#"{"is_partner_ready": true, "confidence": "high",
            "key_signals": ["case studies"], "red_flags": null,
            "positioning": "balanced", "reasoning": "Good fit."}"#]);
        let judgment = judge(Some(&llm), "Acme", "https://acme.com", "text", None)
            .await
            .expect("judgment kept");
        assert!(judgment.is_partner_ready);
        assert_eq!(judgment.confidence, Confidence::High);
        assert!(judgment.red_flags.is_empty());
    }

    #[test]
    fn test_unknown_positioning_reads_as_unclear() {
        let judgment: LlmJudgment =
            serde_json::from_str(r#"{"is_partner_ready": true, "positioning": "agency"}"#).unwrap();
        assert_eq!(judgment.positioning, Positioning::Unclear);
    }

    #[test]
    fn test_prompt_truncates_page_text() {
        let homepage = "h".repeat(HOMEPAGE_CHAR_LIMIT + 500);
        let careers = "c".repeat(CAREERS_CHAR_LIMIT + 500);
        let prompt = build_judgment_prompt("Acme", "https://acme.com", &homepage, Some(&careers));

        assert!(prompt.contains(&"h".repeat(HOMEPAGE_CHAR_LIMIT)));
        assert!(!prompt.contains(&"h".repeat(HOMEPAGE_CHAR_LIMIT + 1)));
        assert!(prompt.contains("Careers Page Content:"));
        assert!(prompt.contains(&"c".repeat(CAREERS_CHAR_LIMIT)));
        assert!(!prompt.contains(&"c".repeat(CAREERS_CHAR_LIMIT + 1)));
    }

    #[test]
    fn test_prompt_leaves_markers_inside_values_alone() {
        let prompt = build_judgment_prompt("{url} {page_content}", "https://acme.com", "Home {company}", None);
        assert!(prompt.contains("Company: {url} {page_content}\n"));
        assert!(prompt.contains("URL: https://acme.com\n"));
        assert!(prompt.contains("Homepage Content:\nHome {company}"));
    }

    #[test]
    fn test_prompt_omits_careers_section_when_absent() {
        let prompt = build_judgment_prompt("Acme", "https://acme.com", "home", None);
        assert!(!prompt.contains("Careers Page Content:"));
        assert!(prompt.contains("Company: Acme"));
    }

    #[tokio::test]
    async fn test_judge_without_capability_is_absent() {
        assert!(judge(None, "Acme", "https://acme.com", "text", None).await.is_none());
    }

    #[tokio::test]
    async fn test_judge_parses_fenced_reply() {
        let llm = ScriptedLlm::replying(&[FULL_JUDGMENT]);
        let judgment = judge(Some(&llm), "Acme", "https://acme.com", "text", None).await;
        assert_eq!(judgment.unwrap().positioning, Positioning::ConsultingFirst);
    }

    #[tokio::test]
    async fn test_judge_discards_malformed_reply() {
        let llm = ScriptedLlm::replying(&["I think they are great partners!"]);
        assert!(judge(Some(&llm), "Acme", "https://acme.com", "text", None).await.is_none());
    }

    #[tokio::test]
    async fn test_judge_unavailable_backend_is_absent() {
        let llm = ScriptedLlm::unavailable();
        assert!(judge(Some(&llm), "Acme", "https://acme.com", "text", None).await.is_none());
    }
}
