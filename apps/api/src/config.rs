use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_LLM_MODEL: &str = "stepfun/step-3.5-flash:free";

/// Application configuration loaded from environment variables.
///
/// API keys are optional: a missing key disables the dependent capability for
/// the whole run instead of failing startup. Only malformed numeric values are
/// treated as fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub serp_api_key: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub vocabulary_path: Option<PathBuf>,
    pub search_delay_min_ms: u64,
    pub search_delay_max_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let search_delay_min_ms = parse_env("SEARCH_DELAY_MIN_MS", 1000)?;
        let search_delay_max_ms = parse_env("SEARCH_DELAY_MAX_MS", 2000)?;

        Ok(Config {
            serp_api_key: optional_env("SERP_API_KEY"),
            llm_api_key: optional_env("OPENROUTER_API_KEY"),
            llm_base_url: optional_env("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            vocabulary_path: optional_env("SCOUT_VOCABULARY_PATH").map(PathBuf::from),
            search_delay_min_ms,
            search_delay_max_ms: search_delay_max_ms.max(search_delay_min_ms),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
