//! # Page Search Handler
//!
//! Finds previously processed windows whose text is closest to a query.

use super::{AppError, AppState};
use axum::{extract::State, Json};
use pdfinsight::providers::vector::VectorMatch;
use serde::Deserialize;
use tracing::info;

fn default_top_k() -> usize {
    5
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchPagesRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Handler for `POST /search/pages`.
pub async fn search_pages_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SearchPagesRequest>,
) -> Result<Json<Vec<VectorMatch>>, AppError> {
    if payload.query.trim().is_empty() {
        return Err(AppError::BadRequest("query must not be empty".to_string()));
    }
    info!("Searching stored windows for '{}'.", payload.query);
    let matches = app_state
        .pipeline
        .search_pages(&payload.query, payload.top_k)
        .await?;
    Ok(Json(matches))
}
