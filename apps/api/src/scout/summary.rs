//! Batch Summarizer: a short qualitative roll-up of a run's accepted
//! records, plus the markdown report shown next to the table.

use crate::llm_client::prompts::fill_template;
use crate::llm_client::Completion;
use crate::models::record::ValidationRecord;
use crate::scout::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};

pub const NO_COMPANIES_MESSAGE: &str = "No companies to summarize.";
pub const NO_RESULTS_REPORT: &str = "No suitable companies found.";

/// Records beyond this many are left out of the prompt.
const SUMMARY_RECORD_LIMIT: usize = 10;
const REPORT_TOP_N: usize = 3;
const SUMMARY_MAX_TOKENS: u32 = 500;
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Roll-up text for a run. Only a `Narrative` came from the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSummary {
    Narrative(String),
    Fallback(String),
}

impl BatchSummary {
    pub fn narrative(&self) -> Option<&str> {
        match self {
            BatchSummary::Narrative(text) => Some(text),
            BatchSummary::Fallback(_) => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            BatchSummary::Narrative(text) | BatchSummary::Fallback(text) => text,
        }
    }
}

/// Always yields displayable text: the model's narrative when available,
/// otherwise a count-based sentence.
pub async fn summarize(llm: Option<&dyn Completion>, records: &[ValidationRecord]) -> BatchSummary {
    match narrate(llm, records).await {
        Some(narrative) => BatchSummary::Narrative(narrative),
        None => BatchSummary::Fallback(fallback_summary(records)),
    }
}

async fn narrate(llm: Option<&dyn Completion>, records: &[ValidationRecord]) -> Option<String> {
    let llm = llm?;
    if records.is_empty() {
        return None;
    }

    let companies = records
        .iter()
        .take(SUMMARY_RECORD_LIMIT)
        .map(company_line)
        .collect::<Vec<_>>()
        .join("\n");
    let count = records.len().to_string();
    let prompt = fill_template(
        SUMMARY_PROMPT_TEMPLATE,
        &[("{count}", count.as_str()), ("{companies}", companies.as_str())],
    );

    llm.complete(SUMMARY_SYSTEM, &prompt, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE)
        .await
}

fn fallback_summary(records: &[ValidationRecord]) -> String {
    match records.len() {
        0 => NO_COMPANIES_MESSAGE.to_string(),
        n => format!("Found {n} validated companies. Review the table for details."),
    }
}

fn company_line(record: &ValidationRecord) -> String {
    let mut line = format!("- {}: {}", record.company, record.reasons.join("; "));
    if let Some(judgment) = &record.llm_judgment {
        line.push_str(&format!(" | Positioning: {}", judgment.positioning));
    }
    line
}

/// Markdown report: the narrative (if any) followed by the top three records.
pub fn render_report(records: &[ValidationRecord], narrative: Option<&str>) -> String {
    if records.is_empty() {
        return NO_RESULTS_REPORT.to_string();
    }

    let mut lines: Vec<String> = match narrative {
        Some(text) => vec![
            "\n### Strategic Analysis\n".to_string(),
            text.to_string(),
            "\n".to_string(),
        ],
        None => vec!["\n### Top Strongest Fits\n".to_string()],
    };

    lines.push("\n### Top 3 Companies\n".to_string());
    for record in records.iter().take(REPORT_TOP_N) {
        let evidence = if record.evidence.is_empty() {
            "N/A".to_string()
        } else {
            record.evidence.join(" | ")
        };
        lines.push(format!(
            "**{}** ({} confidence)",
            record.company, record.confidence
        ));
        lines.push(format!("- *Why*: {}", record.reasons.join("; ")));
        lines.push(format!("- *Evidence*: {evidence}"));
        lines.push(String::new());
    }

    lines.join("\n")
}
