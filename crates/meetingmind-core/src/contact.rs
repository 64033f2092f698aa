//! Contact directory derived from meetings and commitments.

use std::collections::HashMap;
use std::sync::Arc;

use meetingmind_types::commitment::{Commitment, CommitmentFilter, CommitmentStatus};
use meetingmind_types::contact::ContactSummary;
use meetingmind_types::error::CommitmentError;
use meetingmind_types::meeting::Meeting;

use crate::commitment::manager::CommitmentManager;
use crate::commitment::repository::CommitmentRepository;
use crate::meeting::repository::MeetingRepository;

pub struct ContactDirectory<M: MeetingRepository, C: CommitmentRepository> {
    meetings: Arc<M>,
    commitments: Arc<CommitmentManager<C>>,
}

impl<M: MeetingRepository, C: CommitmentRepository> ContactDirectory<M, C> {
    pub fn new(meetings: Arc<M>, commitments: Arc<CommitmentManager<C>>) -> Self {
        Self {
            meetings,
            commitments,
        }
    }

    /// Every participant seen in a meeting, most frequent first.
    pub async fn list(&self) -> Result<Vec<ContactSummary>, CommitmentError> {
        let meetings = self.meetings.list().await?;
        let commitments = self.commitments.list(&CommitmentFilter::default()).await?;
        Ok(summarize(&meetings, &commitments))
    }
}

/// Names are grouped case-insensitively and shown as first seen. A
/// commitment counts toward a contact when its owner or recipient equals the
/// name, ignoring case, and it is not completed.
pub fn summarize(meetings: &[Meeting], commitments: &[Commitment]) -> Vec<ContactSummary> {
    let mut by_key: HashMap<String, ContactSummary> = HashMap::new();

    for meeting in meetings {
        let mut seen_here: Vec<String> = Vec::new();
        for name in &meeting.participants {
            let key = name.trim().to_lowercase();
            if key.is_empty() || seen_here.contains(&key) {
                continue;
            }
            seen_here.push(key.clone());

            let entry = by_key.entry(key).or_insert_with(|| ContactSummary {
                name: name.trim().to_string(),
                meeting_count: 0,
                last_meeting: meeting.meeting_date,
                open_commitments: 0,
            });
            entry.meeting_count += 1;
            if meeting.meeting_date > entry.last_meeting {
                entry.last_meeting = meeting.meeting_date;
            }
        }
    }

    for commitment in commitments
        .iter()
        .filter(|c| c.status != CommitmentStatus::Completed)
    {
        let owner = commitment.owner.trim().to_lowercase();
        let recipient = commitment.recipient.trim().to_lowercase();
        if let Some(entry) = by_key.get_mut(&owner) {
            entry.open_commitments += 1;
        }
        if recipient != owner {
            if let Some(entry) = by_key.get_mut(&recipient) {
                entry.open_commitments += 1;
            }
        }
    }

    let mut contacts: Vec<ContactSummary> = by_key.into_values().collect();
    contacts.sort_by(|a, b| {
        b.meeting_count
            .cmp(&a.meeting_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    contacts
}
