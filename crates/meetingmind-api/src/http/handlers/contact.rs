//! Contact directory handler.

use axum::extract::State;
use axum::Json;

use meetingmind_types::contact::ContactSummary;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/contacts - Everyone seen in meetings, most frequent first.
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactSummary>>, AppError> {
    Ok(Json(state.contacts.list().await?))
}
