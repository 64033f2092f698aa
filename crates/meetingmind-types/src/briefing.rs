//! Briefing stream events.
//!
//! A briefing is delivered as a sequence of `Token` events followed by
//! exactly one terminal event: `Done` on success, `Error` on failure.

use serde::{Deserialize, Serialize};

/// One event of a briefing stream. Serializes as `{"type": "token", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BriefingEvent {
    Token { content: String },
    Error { message: String },
    Done,
}

impl BriefingEvent {
    pub fn token(content: impl Into<String>) -> Self {
        BriefingEvent::Token {
            content: content.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BriefingEvent::Token { .. })
    }
}
