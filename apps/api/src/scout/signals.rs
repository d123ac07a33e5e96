//! Keyword Signal Extractor: case-insensitive substring matching of page text
//! against fixed vocabularies.
//!
//! Matching is deliberately permissive: a term matches anywhere in the text,
//! including inside longer words ("roi" matches "heroic").

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Terms found in a text, split by the vocabulary they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordMatch {
    pub positive_matches: BTreeSet<String>,
    pub negative_matches: BTreeSet<String>,
}

impl KeywordMatch {
    pub fn has_positive(&self) -> bool {
        !self.positive_matches.is_empty()
    }

    /// First `n` positive matches, joined for display.
    pub fn positive_preview(&self, n: usize) -> String {
        preview(&self.positive_matches, n)
    }
}

fn preview(terms: &BTreeSet<String>, n: usize) -> String {
    terms
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the vocabulary terms that occur as substrings of `text`.
pub fn extract_signals<S: AsRef<str>>(text: &str, positive: &[S], negative: &[S]) -> KeywordMatch {
    let text_lower = text.to_lowercase();
    KeywordMatch {
        positive_matches: matching_terms(&text_lower, positive),
        negative_matches: matching_terms(&text_lower, negative),
    }
}

fn matching_terms<S: AsRef<str>>(text_lower: &str, vocabulary: &[S]) -> BTreeSet<String> {
    vocabulary
        .iter()
        .map(AsRef::as_ref)
        .filter(|term| !term.is_empty() && text_lower.contains(&term.to_lowercase()))
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// The five keyword lists used by the decision engine. Immutable once loaded;
/// tests swap in their own lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Homepage partner/ecosystem language. Matched without a negative list.
    pub partner: Vec<String>,
    /// Homepage outcome language (positive side of the outcome/hiring pair).
    pub outcome: Vec<String>,
    /// Homepage staffing language (negative side of the outcome/hiring pair).
    pub hiring: Vec<String>,
    /// Careers-page consulting roles.
    pub consulting_roles: Vec<String>,
    /// Careers-page engineering roles.
    pub engineering_roles: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            partner: strings(&[
                "partner",
                "ecosystem",
                "implementation",
                "alliance",
                "joint venture",
            ]),
            outcome: strings(&[
                "business outcome",
                "value",
                "transformation",
                "roi",
                "strategic",
                "roadmap",
                "advisory",
            ]),
            hiring: strings(&[
                "staff augmentation",
                "hiring engineers",
                "100+ engineers",
                "dedicated team",
                "outstaffing",
            ]),
            consulting_roles: strings(&[
                "consultant",
                "strategist",
                "engagement manager",
                "client partner",
                "solution architect",
                "delivery lead",
            ]),
            engineering_roles: strings(&[
                "software engineer",
                "full stack developer",
                "backend developer",
                "frontend developer",
                "qa engineer",
            ]),
        }
    }
}

impl Vocabulary {
    /// Loads vocabularies from a JSON file. Lists missing from the file keep
    /// their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Vocabulary file {} is not valid JSON", path.display()))
    }
}

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}
