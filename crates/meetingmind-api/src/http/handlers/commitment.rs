//! Commitment listing and update handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use meetingmind_types::commitment::{
    Commitment, CommitmentFilter, CommitmentStatus, CommitmentUpdate,
};
use meetingmind_types::error::CommitmentError;

use super::{non_blank, parse_id};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CommitmentListQuery {
    /// pending, completed or overdue.
    pub status: Option<String>,
    pub contact: Option<String>,
}

/// GET /api/commitments - Sorted by due date, undated last.
pub async fn list_commitments(
    State(state): State<AppState>,
    Query(query): Query<CommitmentListQuery>,
) -> Result<Json<Vec<Commitment>>, AppError> {
    let status = non_blank(query.status)
        .map(|s| s.parse::<CommitmentStatus>())
        .transpose()
        .map_err(AppError::Validation)?;
    let filter = CommitmentFilter {
        status,
        contact: non_blank(query.contact),
    };
    Ok(Json(state.commitments.list(&filter).await?))
}

/// PATCH /api/commitments/{id} - Change status and/or due date.
pub async fn update_commitment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommitmentUpdate>,
) -> Result<Json<Commitment>, AppError> {
    let id = parse_id(&id).ok_or(CommitmentError::NotFound)?;
    Ok(Json(state.commitments.update(&id, body).await?))
}
