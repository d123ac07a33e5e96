pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scout::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/queries", get(handlers::handle_list_queries))
        .route("/api/v1/research", post(handlers::handle_research))
        .route("/api/v1/export", post(handlers::handle_export))
        .with_state(state)
}
