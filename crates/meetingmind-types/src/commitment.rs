//! Commitment types for MeetingMind.
//!
//! Commitments are promises extracted from meeting transcripts. Each one is
//! either owed by the note-taker (`SelfOwed`) or owed to them (`OwedToSelf`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentStatus {
    Pending,
    Completed,
    Overdue,
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitmentStatus::Pending => write!(f, "pending"),
            CommitmentStatus::Completed => write!(f, "completed"),
            CommitmentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for CommitmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CommitmentStatus::Pending),
            "completed" => Ok(CommitmentStatus::Completed),
            "overdue" => Ok(CommitmentStatus::Overdue),
            other => Err(format!("invalid commitment status: '{other}'")),
        }
    }
}

/// Who owes whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentDirection {
    /// The note-taker promised something to a counterparty.
    SelfOwed,
    /// A counterparty promised something to the note-taker.
    OwedToSelf,
}

impl CommitmentDirection {
    /// Short label used when rendering commitments into prompts.
    pub fn label(&self) -> &'static str {
        match self {
            CommitmentDirection::SelfOwed => "You owe",
            CommitmentDirection::OwedToSelf => "Owed to you",
        }
    }
}

impl fmt::Display for CommitmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitmentDirection::SelfOwed => write!(f, "self_owed"),
            CommitmentDirection::OwedToSelf => write!(f, "owed_to_self"),
        }
    }
}

impl FromStr for CommitmentDirection {
    type Err = String;

    /// Accepts the canonical tags plus the `i_owe` / `owed_to_me` aliases
    /// some model prompts produce.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "self_owed" | "i_owe" => Ok(CommitmentDirection::SelfOwed),
            "owed_to_self" | "owed_to_me" => Ok(CommitmentDirection::OwedToSelf),
            other => Err(format!("invalid commitment direction: '{other}'")),
        }
    }
}

/// A stored commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    pub id: Uuid,
    pub description: String,
    /// Who made the promise.
    pub owner: String,
    /// Who it was promised to.
    pub recipient: String,
    pub direction: CommitmentDirection,
    pub due_date: Option<DateTime<Utc>>,
    pub status: CommitmentStatus,
    pub meeting_id: Uuid,
    pub meeting_title: String,
    pub created_at: DateTime<Utc>,
    /// Set exactly when `status` is `Completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Commitment {
    /// Case-insensitive substring match of `contact` against owner or recipient.
    pub fn involves(&self, contact: &str) -> bool {
        let contact = contact.to_lowercase();
        self.owner.to_lowercase().contains(&contact)
            || self.recipient.to_lowercase().contains(&contact)
    }
}

/// Unvalidated commitment as produced by the classifier, before direction
/// resolution and binding to a meeting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCommitment {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Client-driven partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitmentUpdate {
    #[serde(default)]
    pub status: Option<CommitmentStatus>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Filter for listing commitments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitmentFilter {
    #[serde(default)]
    pub status: Option<CommitmentStatus>,
    #[serde(default)]
    pub contact: Option<String>,
}
