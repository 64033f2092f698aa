//! Meeting types for MeetingMind.
//!
//! A meeting is created on intake in the `Processing` state and moved to a
//! terminal state exactly once by the lifecycle coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Processing,
    Completed,
    Failed,
}

impl MeetingStatus {
    /// Whether the status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, MeetingStatus::Completed | MeetingStatus::Failed)
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingStatus::Processing => write!(f, "processing"),
            MeetingStatus::Completed => write!(f, "completed"),
            MeetingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for MeetingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processing" => Ok(MeetingStatus::Processing),
            "completed" => Ok(MeetingStatus::Completed),
            "failed" => Ok(MeetingStatus::Failed),
            other => Err(format!("invalid meeting status: '{other}'")),
        }
    }
}

/// A submitted meeting and its processing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    /// Participant display names in submission order. The first participant
    /// is treated as the note-taker.
    pub participants: Vec<String>,
    pub meeting_date: DateTime<Utc>,
    /// Full transcript text.
    pub notes: String,
    /// Short model-generated summary, set during processing.
    pub summary: Option<String>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
}

/// Intake payload for a new meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingInput {
    pub title: String,
    pub participants: Vec<String>,
    pub meeting_date: DateTime<Utc>,
    pub notes: String,
}

/// Returned from intake before processing has finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingReceipt {
    pub meeting_id: Uuid,
    pub status: MeetingStatus,
}
