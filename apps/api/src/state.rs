use std::sync::Arc;

use crate::scout::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Validation pipeline with its capabilities (fetch, search, LLM) wired in.
    /// Capabilities whose keys are missing are simply absent.
    pub pipeline: Arc<Pipeline>,
}
