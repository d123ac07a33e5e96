use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::record::ValidationRecord;
use crate::scout::export::{to_csv, to_markdown};
use crate::scout::queries::{default_queries, DEFAULT_QUERY_INDICES, HIGH_INTENT_QUERIES};
use crate::scout::summary::{render_report, summarize};
use crate::state::AppState;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const MAX_RESULTS_LIMIT: usize = 20;

const NO_RESULTS_GUIDANCE: &str = "No companies found that matched the strict validation criteria. \
Try increasing the number of results or selecting more queries.";

#[derive(Serialize)]
pub struct QueryCatalogue {
    pub queries: Vec<&'static str>,
    pub default_indices: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResearchRequest {
    pub queries: Option<Vec<String>>,
    pub max_results: Option<usize>,
}

#[derive(Serialize)]
pub struct ResearchResponse {
    pub run_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub queries_run: usize,
    pub records: Vec<ValidationRecord>,
    pub summary: String,
    pub report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Markdown,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub records: Vec<ValidationRecord>,
    pub format: ExportFormat,
}

/// GET /api/v1/queries
pub async fn handle_list_queries() -> Json<QueryCatalogue> {
    Json(QueryCatalogue {
        queries: HIGH_INTENT_QUERIES.to_vec(),
        default_indices: DEFAULT_QUERY_INDICES.to_vec(),
    })
}

/// POST /api/v1/research
pub async fn handle_research(
    State(state): State<AppState>,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchResponse>, AppError> {
    let Json(req) = payload?;
    let queries = match req.queries {
        None => default_queries(),
        Some(queries) => {
            let queries: Vec<String> = queries
                .into_iter()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .collect();
            if queries.is_empty() {
                return Err(AppError::Validation(
                    "Please select at least one query.".to_string(),
                ));
            }
            queries
        }
    };

    let max_results = req.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(AppError::Validation(format!(
            "max_results must be between 1 and {MAX_RESULTS_LIMIT}"
        )));
    }

    let run = state.pipeline.run_batch(&queries, max_results).await;

    let summary = summarize(state.pipeline.llm(), &run.records).await;
    let report = render_report(&run.records, summary.narrative());
    let message = run
        .records
        .is_empty()
        .then(|| NO_RESULTS_GUIDANCE.to_string());

    Ok(Json(ResearchResponse {
        run_id: run.run_id,
        completed_at: run.completed_at,
        queries_run: run.queries_run,
        records: run.records,
        summary: summary.into_text(),
        report,
        message,
    }))
}

/// POST /api/v1/export
pub async fn handle_export(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let (content_type, filename, body) = match req.format {
        ExportFormat::Csv => ("text/csv; charset=utf-8", "partner_shortlist.csv", to_csv(&req.records)),
        ExportFormat::Markdown => (
            "text/markdown; charset=utf-8",
            "partner_shortlist.md",
            to_markdown(&req.records),
        ),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
