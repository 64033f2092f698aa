//! Memory search and recent-memory handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use meetingmind_types::memory::{MemoryItem, SearchResult};

use super::non_blank;
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub contact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MemoriesQuery {
    pub contact: Option<String>,
    pub memory_type: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/search - Deduplicated memory hits, best first.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let results = state
        .search
        .search(&params.query, params.contact.as_deref())
        .await?;
    Ok(Json(results))
}

/// GET /api/memories - Newest stored memory items.
pub async fn recent_memories(
    State(state): State<AppState>,
    Query(query): Query<MemoriesQuery>,
) -> Result<Json<Vec<MemoryItem>>, AppError> {
    let memory_type = non_blank(query.memory_type);
    let items = state
        .search
        .recent(query.contact.as_deref(), memory_type.as_deref(), query.limit)
        .await?;
    Ok(Json(items))
}
