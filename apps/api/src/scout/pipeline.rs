//! Validation pipeline: drives one candidate from URL to record, and a batch
//! of queries to a deduplicated record list.
//!
//! Execution is strictly sequential: one candidate at a time, one query at a
//! time. A failed fetch or LLM call only degrades the candidate it belongs to.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm_client::Completion;
use crate::models::candidate::Candidate;
use crate::models::record::ValidationRecord;
use crate::scout::decision::{Decision, DecisionEngine, Rejection};
use crate::scout::fetcher::{page_text, parse_homepage, ContentFetcher, FetchResult};
use crate::scout::judgment::judge;
use crate::scout::outreach::generate_outreach;
use crate::scout::search::{SearchDelay, SearchService};

/// Number of reasons used as the company description for outreach.
const DESCRIPTION_REASONS: usize = 2;

/// Outcome of a batch run. Records keep insertion order, one per website.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRun {
    pub run_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub queries_run: usize,
    pub records: Vec<ValidationRecord>,
}

pub struct Pipeline {
    fetcher: Arc<dyn ContentFetcher>,
    search: Option<Arc<dyn SearchService>>,
    llm: Option<Arc<dyn Completion>>,
    engine: DecisionEngine,
    search_delay: SearchDelay,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, engine: DecisionEngine) -> Self {
        Self {
            fetcher,
            search: None,
            llm: None,
            engine,
            search_delay: SearchDelay::none(),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchService>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn Completion>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_search_delay(mut self, delay: SearchDelay) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn llm(&self) -> Option<&dyn Completion> {
        self.llm.as_deref()
    }

    /// Validates one candidate. Returns a record only on acceptance.
    pub async fn validate_candidate(&self, candidate: &Candidate) -> Option<ValidationRecord> {
        let name = candidate.name.as_str();
        let url = candidate.url.as_str();

        // A page with markup but no visible text still counts as content.
        let homepage = match self.fetcher.fetch(url).await {
            FetchResult::Content(html) if !html.trim().is_empty() => {
                Some(parse_homepage(&html, url))
            }
            _ => None,
        };

        let careers_text = match homepage.as_ref().and_then(|p| p.careers_url.as_deref()) {
            Some(careers_url) => {
                debug!(company = %name, careers_url = %careers_url, "Fetching careers page");
                self.fetcher
                    .fetch(careers_url)
                    .await
                    .content()
                    .map(page_text)
            }
            None => None,
        };

        let homepage_text = homepage.as_ref().map(|p| p.text.as_str());
        let mut signals = self
            .engine
            .collect_signals(homepage_text, careers_text.as_deref());

        // Neither case needs the model's opinion.
        let Some(homepage_text) = homepage_text else {
            log_rejection(name, url, &Rejection::NoHomepageContent);
            return None;
        };
        if let Some(rejection) = self.engine.body_shop_rejection(&signals) {
            log_rejection(name, url, &rejection);
            return None;
        }

        signals.judgment = judge(self.llm(), name, url, homepage_text, careers_text.as_deref()).await;

        let assessment = match self.engine.decide(&signals) {
            Decision::Accepted(assessment) => assessment,
            Decision::Rejected(rejection) => {
                log_rejection(name, url, &rejection);
                return None;
            }
        };

        let description = assessment
            .reasons
            .iter()
            .take(DESCRIPTION_REASONS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ");
        let outreach_searches =
            generate_outreach(self.llm(), name, &description, signals.judgment.as_ref()).await;

        info!(
            company = %name,
            url = %url,
            confidence = %assessment.confidence,
            reasons = assessment.reasons.len(),
            "Candidate accepted"
        );

        Some(ValidationRecord {
            company: name.to_string(),
            website: url.to_string(),
            reasons: assessment.reasons,
            evidence: assessment.evidence,
            outreach_searches,
            confidence: assessment.confidence,
            llm_judgment: signals.judgment,
        })
    }

    /// Runs one query and validates its candidates, skipping websites already
    /// in `seen`. Every resolved candidate's website is added to `seen`.
    pub async fn process_query(
        &self,
        query: &str,
        max_results: usize,
        seen: &mut HashSet<String>,
    ) -> Vec<ValidationRecord> {
        let Some(search) = self.search.as_ref() else {
            return Vec::new();
        };

        let hits = search.search(query, max_results).await;
        self.search_delay.wait().await;
        info!(query = %query, hits = hits.len(), "Search returned");

        let mut records = Vec::new();
        for candidate in hits.iter().filter_map(Candidate::from_hit) {
            if seen.contains(&candidate.url) {
                debug!(url = %candidate.url, "Skipping duplicate website");
                continue;
            }
            let record = self.validate_candidate(&candidate).await;
            seen.insert(candidate.url);
            records.extend(record);
        }
        records
    }

    /// Runs every query in order and collects the accepted records. The first
    /// occurrence of a website wins.
    pub async fn run_batch(&self, queries: &[String], max_results: usize) -> BatchRun {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, queries = queries.len(), max_results, "Batch started");
        if self.search.is_none() {
            warn!(run_id = %run_id, "Search capability disabled, batch will find no candidates");
        }

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for (i, query) in queries.iter().enumerate() {
            info!(run_id = %run_id, "Running query {}/{}: {}", i + 1, queries.len(), query);
            let found = self.process_query(query, max_results, &mut seen).await;
            records.extend(found);
        }

        info!(run_id = %run_id, accepted = records.len(), "Batch complete");
        BatchRun {
            run_id,
            completed_at: Utc::now(),
            queries_run: queries.len(),
            records,
        }
    }
}

fn log_rejection(company: &str, url: &str, rejection: &Rejection) {
    match rejection {
        Rejection::BodyShop {
            engineering_roles,
            consulting_roles,
        } => info!(
            company = %company,
            url = %url,
            engineering_roles,
            consulting_roles,
            "Rejected: body shop"
        ),
        Rejection::LlmVeto { reasoning } => {
            info!(company = %company, url = %url, reasoning = %reasoning, "Rejected: LLM veto")
        }
        Rejection::NoHomepageContent => {
            info!(company = %company, url = %url, "Rejected: no homepage content")
        }
        Rejection::NoFitSignals => {
            info!(company = %company, url = %url, "Rejected: no fit signals")
        }
    }
}
