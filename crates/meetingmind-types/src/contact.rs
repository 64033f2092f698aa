//! Contact summaries derived from meetings and commitments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated view of one person seen in meetings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub name: String,
    pub meeting_count: usize,
    pub last_meeting: DateTime<Utc>,
    /// Commitments not yet completed where this contact is owner or recipient.
    pub open_commitments: usize,
}
