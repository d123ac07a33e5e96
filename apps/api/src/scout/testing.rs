//! Scripted stand-ins for the external capabilities, used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;

use crate::llm_client::Completion;
use crate::models::candidate::SearchHit;
use crate::scout::fetcher::{ContentFetcher, FetchResult};
use crate::scout::search::SearchService;

/// Replays canned replies in order; once exhausted it behaves as unavailable.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Some(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedLlm {
    async fn complete(
        &self,
        _system: &str,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies.lock().unwrap().pop_front().flatten()
    }
}

/// Serves pages from a map; unknown URLs are unavailable.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => FetchResult::Content(html.clone()),
            None => FetchResult::Unavailable,
        }
    }
}

/// Returns fixed hits per query; unknown queries yield nothing.
#[derive(Default)]
pub struct StaticSearch {
    results: HashMap<String, Vec<SearchHit>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticSearch {
    pub fn with_results(mut self, query: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(title, url)| SearchHit {
                title: title.to_string(),
                url: url.to_string(),
                snippet: String::new(),
            })
            .collect();
        self.results.insert(query.to_string(), hits);
        self
    }

    /// `(query, max_results)` pairs received so far.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for StaticSearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        self.results
            .get(query)
            .map(|hits| hits.iter().take(max_results).cloned().collect())
            .unwrap_or_default()
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A local URL with nothing listening on it.
pub async fn unbound_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
