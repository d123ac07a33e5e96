mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod scout;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scout::decision::DecisionEngine;
use crate::scout::fetcher::HttpFetcher;
use crate::scout::pipeline::Pipeline;
use crate::scout::search::{SearchDelay, SerperClient};
use crate::scout::signals::Vocabulary;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed numeric settings are the only fatal configuration error
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = match &config.vocabulary_path {
        Some(path) => {
            let vocabulary = Vocabulary::from_json_file(path)?;
            info!("Keyword vocabulary loaded from {}", path.display());
            vocabulary
        }
        None => Vocabulary::default(),
    };

    let mut pipeline = Pipeline::new(Arc::new(HttpFetcher::new()?), DecisionEngine::new(vocabulary))
        .with_search_delay(SearchDelay::new(
            config.search_delay_min_ms,
            config.search_delay_max_ms,
        ));

    match &config.serp_api_key {
        Some(key) => {
            pipeline = pipeline.with_search(Arc::new(SerperClient::new(key.clone())?));
            info!("Search client initialized");
        }
        None => warn!("SERP_API_KEY not set; search is disabled and runs will find no candidates"),
    }

    match &config.llm_api_key {
        Some(key) => {
            let llm = LlmClient::new(
                key.clone(),
                config.llm_base_url.clone(),
                config.llm_model.clone(),
            )?;
            info!("LLM client initialized (model: {})", llm.model());
            pipeline = pipeline.with_llm(Arc::new(llm));
        }
        None => warn!(
            "OPENROUTER_API_KEY not set; LLM judgment disabled, keyword heuristics and fallback templates only"
        ),
    }

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
