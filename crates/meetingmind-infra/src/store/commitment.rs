//! DashMap-backed implementation of [`CommitmentRepository`].

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use meetingmind_core::commitment::repository::CommitmentRepository;
use meetingmind_types::commitment::Commitment;
use meetingmind_types::error::RepositoryError;

#[derive(Debug, Default)]
pub struct InMemoryCommitmentRepository {
    commitments: DashMap<Uuid, Commitment>,
}

impl InMemoryCommitmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommitmentRepository for InMemoryCommitmentRepository {
    async fn create(&self, commitment: &Commitment) -> Result<(), RepositoryError> {
        match self.commitments.entry(commitment.id) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "commitment {} already exists",
                commitment.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(commitment.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Commitment>, RepositoryError> {
        Ok(self.commitments.get(id).map(|c| c.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Commitment>, RepositoryError> {
        Ok(self.commitments.iter().map(|c| c.value().clone()).collect())
    }

    async fn update(&self, commitment: &Commitment) -> Result<(), RepositoryError> {
        match self.commitments.get_mut(&commitment.id) {
            Some(mut entry) => {
                *entry = commitment.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meetingmind_core::commitment::manager::CommitmentManager;
    use meetingmind_types::commitment::{
        CommitmentDirection, CommitmentStatus, CommitmentUpdate,
    };
    use meetingmind_types::error::CommitmentError;

    fn make_commitment(description: &str) -> Commitment {
        Commitment {
            id: Uuid::now_v7(),
            description: description.to_string(),
            owner: "Alice".to_string(),
            recipient: "Bob".to_string(),
            direction: CommitmentDirection::SelfOwed,
            due_date: None,
            status: CommitmentStatus::Pending,
            meeting_id: Uuid::now_v7(),
            meeting_title: "Sync".to_string(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let repo = InMemoryCommitmentRepository::new();
        let commitment = make_commitment("Send report");
        repo.create(&commitment).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.get(&commitment.id).await.unwrap().is_some());
        assert!(matches!(
            repo.create(&commitment).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(matches!(
            repo.update(&make_commitment("other")).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_manager_completion_through_repository() {
        let manager = CommitmentManager::new(InMemoryCommitmentRepository::new());
        let created = manager.create(make_commitment("Send report")).await.unwrap();

        let update = CommitmentUpdate {
            status: Some(CommitmentStatus::Completed),
            due_date: None,
        };
        let updated = manager.update(&created.id, update).await.unwrap();
        assert_eq!(updated.status, CommitmentStatus::Completed);
        assert!(updated.completed_at.is_some());

        let stored = manager.repo().get(&created.id).await.unwrap().unwrap();
        assert!(stored.completed_at.is_some());

        assert!(matches!(
            manager.update(&Uuid::now_v7(), CommitmentUpdate::default()).await,
            Err(CommitmentError::NotFound)
        ));
    }
}
