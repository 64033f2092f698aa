//! HTTP request handlers for the REST API.

pub mod briefing;
pub mod commitment;
pub mod contact;
pub mod health;
pub mod meeting;
pub mod search;

use uuid::Uuid;

/// Treat an empty or whitespace-only query parameter as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a path id; anything that is not a UUID cannot name a stored entity.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    raw.trim().parse().ok()
}
