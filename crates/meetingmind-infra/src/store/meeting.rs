//! DashMap-backed implementation of [`MeetingRepository`].

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use meetingmind_core::meeting::repository::MeetingRepository;
use meetingmind_types::error::RepositoryError;
use meetingmind_types::meeting::Meeting;

#[derive(Debug, Default)]
pub struct InMemoryMeetingRepository {
    meetings: DashMap<Uuid, Meeting>,
}

impl InMemoryMeetingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }
}

impl MeetingRepository for InMemoryMeetingRepository {
    async fn create(&self, meeting: &Meeting) -> Result<(), RepositoryError> {
        match self.meetings.entry(meeting.id) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "meeting {} already exists",
                meeting.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(meeting.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Meeting>, RepositoryError> {
        Ok(self.meetings.get(id).map(|m| m.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Meeting>, RepositoryError> {
        Ok(self.meetings.iter().map(|m| m.value().clone()).collect())
    }

    async fn update(&self, meeting: &Meeting) -> Result<(), RepositoryError> {
        match self.meetings.get_mut(&meeting.id) {
            Some(mut entry) => {
                *entry = meeting.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
