//! Outreach String Generator: role-search strings for reaching
//! decision-makers at an accepted company.

use tracing::warn;

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{parse_structured, Completion, Structured};
use crate::scout::judgment::LlmJudgment;
use crate::scout::prompts::{OUTREACH_PROMPT_TEMPLATE, OUTREACH_SYSTEM};

pub const MAX_OUTREACH_SEARCHES: usize = 3;

const OUTREACH_MAX_TOKENS: u32 = 300;
const OUTREACH_TEMPERATURE: f32 = 0.3;

/// Deterministic searches used whenever the LLM gives nothing usable.
pub fn fallback_searches(company: &str) -> Vec<String> {
    vec![
        format!(r#"site:linkedin.com/in/ "{company}" ("Client Partner" OR "Managing Director" OR "Practice Lead")"#),
        format!(r#"site:linkedin.com/in/ "{company}" ("VP Partnerships" OR "Head of Alliances" OR "Delivery Lead")"#),
        format!(r#"site:linkedin.com/in/ "{company}" ("Partner" OR "Director")"#),
    ]
}

/// Returns one to three search strings for `company`.
pub async fn generate_outreach(
    llm: Option<&dyn Completion>,
    company: &str,
    description: &str,
    judgment: Option<&LlmJudgment>,
) -> Vec<String> {
    let Some(llm) = llm else {
        return fallback_searches(company);
    };

    let mut context = format!("Company: {company}\nDescription: {description}");
    if let Some(judgment) = judgment {
        context.push_str(&format!("\nPositioning: {}", judgment.positioning));
    }
    let prompt = fill_template(
        OUTREACH_PROMPT_TEMPLATE,
        &[("{context}", context.as_str()), ("{json_only}", JSON_ONLY_INSTRUCTION)],
    );

    let Some(raw) = llm
        .complete(
            OUTREACH_SYSTEM,
            &prompt,
            OUTREACH_MAX_TOKENS,
            OUTREACH_TEMPERATURE,
        )
        .await
    else {
        return fallback_searches(company);
    };

    match parse_structured::<Vec<String>>(&raw) {
        Structured::Parsed(searches) => {
            let searches: Vec<String> = searches
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .take(MAX_OUTREACH_SEARCHES)
                .collect();
            if searches.is_empty() {
                warn!(company = %company, "LLM returned no outreach searches, using templates");
                return fallback_searches(company);
            }
            searches
        }
        Structured::Unparsed(_) => fallback_searches(company),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scout::testing::ScriptedLlm;

    #[tokio::test]
    async fn test_fallback_without_llm_is_deterministic() {
        let first = generate_outreach(None, "Acme", "anything", None).await;
        let second = generate_outreach(None, "Acme", "something else", None).await;
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                r#"site:linkedin.com/in/ "Acme" ("Client Partner" OR "Managing Director" OR "Practice Lead")"#,
                r#"site:linkedin.com/in/ "Acme" ("VP Partnerships" OR "Head of Alliances" OR "Delivery Lead")"#,
                r#"site:linkedin.com/in/ "Acme" ("Partner" OR "Director")"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_llm_searches_are_capped_at_three() {
        let llm = ScriptedLlm::replying(&[r#"```json
            ["one", "two", "three", "four"]
            ```"#]);
        let searches = generate_outreach(Some(&llm), "Acme", "desc", None).await;
        assert_eq!(searches, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_unparsable_reply_falls_back() {
        let llm = ScriptedLlm::replying(&["Try searching LinkedIn for Acme partners"]);
        let searches = generate_outreach(Some(&llm), "Acme", "desc", None).await;
        assert_eq!(searches, fallback_searches("Acme"));
    }

    #[tokio::test]
    async fn test_empty_list_falls_back() {
        let llm = ScriptedLlm::replying(&[r#"["  ", ""]"#]);
        let searches = generate_outreach(Some(&llm), "Acme", "desc", None).await;
        assert_eq!(searches, fallback_searches("Acme"));
    }

    #[tokio::test]
    async fn test_unavailable_llm_falls_back() {
        let llm = ScriptedLlm::unavailable();
        let searches = generate_outreach(Some(&llm), "Acme", "desc", None).await;
        assert_eq!(searches, fallback_searches("Acme"));
    }

    #[tokio::test]
    async fn test_prompt_carries_description_and_positioning() {
        let llm = ScriptedLlm::replying(&[r#"["a"]"#]);
        let judgment: LlmJudgment = serde_json::from_str(
            r#"{"is_partner_ready": true, "positioning": "balanced"}"#,
        )
        .unwrap();
        generate_outreach(Some(&llm), "Acme", "Outcome-based language detected", Some(&judgment)).await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("Description: Outcome-based language detected"));
        assert!(prompt.contains("Positioning: balanced"));
    }
}
