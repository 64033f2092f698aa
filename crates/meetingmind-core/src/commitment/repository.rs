//! CommitmentRepository trait definition.

use meetingmind_types::commitment::Commitment;
use meetingmind_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for commitment persistence.
///
/// Implementations live in meetingmind-infra (e.g., `InMemoryCommitmentRepository`)
/// and must be internally synchronized. Stored state is never overdue-projected;
/// that happens in [`super::manager::CommitmentManager`].
pub trait CommitmentRepository: Send + Sync {
    fn create(
        &self,
        commitment: &Commitment,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Commitment>, RepositoryError>> + Send;

    /// All stored commitments, in no particular order.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Commitment>, RepositoryError>> + Send;

    /// Replace a stored commitment. `RepositoryError::NotFound` if absent.
    fn update(
        &self,
        commitment: &Commitment,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
