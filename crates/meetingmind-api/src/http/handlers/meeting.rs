//! Meeting intake and lookup handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use meetingmind_types::error::MeetingError;
use meetingmind_types::meeting::{Meeting, MeetingInput, MeetingReceipt};

use super::{non_blank, parse_id};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MeetingListQuery {
    pub participant: Option<String>,
}

/// POST /api/meetings - Accept a meeting for background processing.
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(body): Json<MeetingInput>,
) -> Result<(StatusCode, Json<MeetingReceipt>), AppError> {
    let receipt = state.meetings.create(body).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/meetings - Newest first, optionally filtered by participant.
pub async fn list_meetings(
    State(state): State<AppState>,
    Query(query): Query<MeetingListQuery>,
) -> Result<Json<Vec<Meeting>>, AppError> {
    let participant = non_blank(query.participant);
    let meetings = state.meetings.list(participant.as_deref()).await?;
    Ok(Json(meetings))
}

/// GET /api/meetings/{id}
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>, AppError> {
    let id = parse_id(&id).ok_or(MeetingError::NotFound)?;
    Ok(Json(state.meetings.get(&id).await?))
}
