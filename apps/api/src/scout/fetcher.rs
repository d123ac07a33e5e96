//! Content Fetcher: retrieves raw page HTML and reduces it to plain text.
//!
//! Every network failure, non-2xx status or timeout collapses into
//! `FetchResult::Unavailable`; nothing is raised past this boundary.
//! Responses are not cached.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Node};
use tracing::{debug, warn};

use crate::scout::careers::find_careers_link;

/// Browser-like identification so company sites serve their normal markup.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Elements whose text never counts as page content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Content(String),
    Unavailable,
}

impl FetchResult {
    pub fn content(&self) -> Option<&str> {
        match self {
            FetchResult::Content(text) => Some(text),
            FetchResult::Unavailable => None,
        }
    }
}

/// Fetch capability. Implementations must never panic or error.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        debug!(url = %url, "Fetching page");
        match self.fetch_html(url).await {
            Ok(html) => FetchResult::Content(html),
            Err(e) => {
                warn!(url = %url, "Error fetching page: {e:#}");
                FetchResult::Unavailable
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// A homepage reduced to the parts the pipeline needs. Owned, so the
/// non-`Send` parsed document never lives across an await point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub text: String,
    pub careers_url: Option<String>,
}

/// Parses a homepage: visible text plus the careers link, if any.
pub fn parse_homepage(html: &str, base_url: &str) -> ParsedPage {
    let document = Html::parse_document(html);
    ParsedPage {
        text: document_text(&document),
        careers_url: find_careers_link(&document, base_url),
    }
}

/// Visible text of an HTML string.
pub fn page_text(html: &str) -> String {
    document_text(&Html::parse_document(html))
}

/// All text nodes outside non-content elements, trimmed and joined with
/// single spaces.
fn document_text(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }
    pieces.join(" ")
}
