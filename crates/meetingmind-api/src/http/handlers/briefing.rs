//! SSE briefing endpoint.
//!
//! GET /api/briefings/{contact}
//!
//! Each briefing event is one `data:` line carrying its JSON form:
//! `{"type":"token","content":"..."}` chunks, then a terminal
//! `{"type":"done"}` or `{"type":"error","message":"..."}`. Closing the
//! connection cancels generation.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::{Stream, StreamExt};

use crate::http::error::AppError;
use crate::state::AppState;

pub async fn stream_briefing(
    State(state): State<AppState>,
    Path(contact): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let contact = state
        .search
        .normalize_contact(Some(contact.as_str()))?
        .ok_or_else(|| AppError::Validation("contact name is required".to_string()))?
        .to_string();

    tracing::info!(contact = %contact, "briefing requested");
    let events = state
        .briefings
        .generate(contact)
        .map(|event| Event::default().json_data(event));

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
