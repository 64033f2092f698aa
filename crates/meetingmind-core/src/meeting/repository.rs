//! MeetingRepository trait definition.

use meetingmind_types::error::RepositoryError;
use meetingmind_types::meeting::Meeting;
use uuid::Uuid;

/// Repository trait for meeting persistence.
///
/// Implementations live in meetingmind-infra (e.g., `InMemoryMeetingRepository`)
/// and must be internally synchronized.
pub trait MeetingRepository: Send + Sync {
    fn create(
        &self,
        meeting: &Meeting,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Meeting>, RepositoryError>> + Send;

    /// All stored meetings, in no particular order.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Meeting>, RepositoryError>> + Send;

    /// Replace a stored meeting. `RepositoryError::NotFound` if absent.
    fn update(
        &self,
        meeting: &Meeting,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
