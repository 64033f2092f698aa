//! Commitment lifecycle: status transitions, overdue projection and listing.
//!
//! Overdue is never stored. Every read path runs
//! [`CommitmentManager::materialize_overdue`] so a pending commitment whose
//! due date has passed reads as `overdue` without a background sweep.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use meetingmind_types::commitment::{
    Commitment, CommitmentFilter, CommitmentStatus, CommitmentUpdate,
};
use meetingmind_types::error::CommitmentError;

use super::repository::CommitmentRepository;

/// Owns commitment state transitions and query semantics.
///
/// Generic over `CommitmentRepository` (meetingmind-core never depends on
/// meetingmind-infra).
pub struct CommitmentManager<R: CommitmentRepository> {
    repo: R,
}

impl<R: CommitmentRepository> CommitmentManager<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Read-time projection: `pending` with a due date strictly before `now`
    /// is presented as `overdue`.
    pub fn materialize_overdue(mut commitment: Commitment, now: DateTime<Utc>) -> Commitment {
        if commitment.status == CommitmentStatus::Pending
            && commitment.due_date.is_some_and(|due| due < now)
        {
            commitment.status = CommitmentStatus::Overdue;
        }
        commitment
    }

    pub async fn create(&self, commitment: Commitment) -> Result<Commitment, CommitmentError> {
        self.repo.create(&commitment).await?;
        Ok(commitment)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Commitment, CommitmentError> {
        let commitment = self
            .repo
            .get(id)
            .await?
            .ok_or(CommitmentError::NotFound)?;
        Ok(Self::materialize_overdue(commitment, Utc::now()))
    }

    /// List commitments matching `filter`, evaluated at `now`.
    ///
    /// The status filter compares against the projected status, so
    /// `status=overdue` finds stored-pending commitments past due.
    pub async fn list_at(
        &self,
        filter: &CommitmentFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Commitment>, CommitmentError> {
        let mut commitments: Vec<Commitment> = self
            .repo
            .list()
            .await?
            .into_iter()
            .map(|c| Self::materialize_overdue(c, now))
            .filter(|c| filter.status.is_none_or(|status| c.status == status))
            .filter(|c| filter.contact.as_deref().is_none_or(|contact| c.involves(contact)))
            .collect();

        commitments.sort_by(compare_by_due_date);
        Ok(commitments)
    }

    pub async fn list(&self, filter: &CommitmentFilter) -> Result<Vec<Commitment>, CommitmentError> {
        self.list_at(filter, Utc::now()).await
    }

    /// Pending and overdue commitments involving `contact`.
    pub async fn open_for_contact(&self, contact: &str) -> Result<Vec<Commitment>, CommitmentError> {
        let filter = CommitmentFilter {
            status: None,
            contact: Some(contact.to_string()),
        };
        Ok(self
            .list(&filter)
            .await?
            .into_iter()
            .filter(|c| c.status != CommitmentStatus::Completed)
            .collect())
    }

    /// Apply a client update.
    ///
    /// Setting `completed` stamps `completed_at`; setting any other status
    /// clears it, keeping `completed_at` set exactly when completed.
    #[tracing::instrument(name = "update_commitment", skip(self, update), fields(commitment_id = %id))]
    pub async fn update(
        &self,
        id: &Uuid,
        update: CommitmentUpdate,
    ) -> Result<Commitment, CommitmentError> {
        let mut commitment = self
            .repo
            .get(id)
            .await?
            .ok_or(CommitmentError::NotFound)?;

        let now = Utc::now();
        if let Some(status) = update.status {
            commitment.status = status;
            commitment.completed_at = match status {
                CommitmentStatus::Completed => Some(now),
                _ => None,
            };
        }
        if let Some(due_date) = update.due_date {
            commitment.due_date = Some(due_date);
        }

        self.repo.update(&commitment).await?;
        info!(status = %commitment.status, "commitment updated");
        Ok(Self::materialize_overdue(commitment, now))
    }
}

/// Ascending due date; undated after dated; creation time breaks ties.
fn compare_by_due_date(a: &Commitment, b: &Commitment) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.created_at.cmp(&b.created_at))
}
