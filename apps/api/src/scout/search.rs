//! Search capability: runs a query against the Serper web-search API.
//!
//! Failures (auth, quota, transport, decoding) are logged and turned into an
//! empty result; callers never see an error.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::candidate::SearchHit;

const SERPER_URL: &str = "https://google.serper.dev/search";
const SEARCH_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit>;
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl From<SerperOrganic> for SearchHit {
    fn from(item: SerperOrganic) -> Self {
        SearchHit {
            title: item.title,
            url: item.link,
            snippet: item.snippet,
        }
    }
}

pub struct SerperClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl SerperClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_endpoint(api_key, SERPER_URL.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create search HTTP client")?;
        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    async fn organic_results(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest {
                q: query,
                num: max_results,
            })
            .send()
            .await
            .context("Search request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search API returned {status}: {body}");
        }

        let body: SerperResponse = response
            .json()
            .await
            .context("Failed to decode search response")?;

        Ok(body
            .organic
            .into_iter()
            .take(max_results)
            .map(SearchHit::from)
            .collect())
    }
}

#[async_trait]
impl SearchService for SerperClient {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        match self.organic_results(query, max_results).await {
            Ok(hits) => {
                debug!(query = %query, hits = hits.len(), "Search completed");
                hits
            }
            Err(e) => {
                warn!(query = %query, "Search degraded to no results: {e:#}");
                Vec::new()
            }
        }
    }
}

/// Uniform pause inserted after every search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchDelay {
    min_ms: u64,
    max_ms: u64,
}

impl SearchDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms,
            max_ms: max_ms.max(min_ms),
        }
    }

    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn sample(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    pub async fn wait(&self) {
        // Sampled before the await so the thread-local RNG is not held across it.
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
