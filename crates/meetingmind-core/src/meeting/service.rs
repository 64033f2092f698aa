//! Meeting intake and lookup.
//!
//! `MeetingService` validates intake against the configured limits, records
//! the meeting in `processing` and enqueues it. It returns as soon as the job
//! is queued; the outcome is observable only through the meeting's status.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use meetingmind_types::config::LimitsConfig;
use meetingmind_types::error::MeetingError;
use meetingmind_types::meeting::{Meeting, MeetingInput, MeetingReceipt, MeetingStatus};

use super::queue::ProcessingQueue;
use super::repository::MeetingRepository;

pub struct MeetingService<M: MeetingRepository> {
    meetings: Arc<M>,
    queue: ProcessingQueue,
    limits: LimitsConfig,
}

impl<M: MeetingRepository> MeetingService<M> {
    pub fn new(meetings: Arc<M>, queue: ProcessingQueue, limits: LimitsConfig) -> Self {
        Self {
            meetings,
            queue,
            limits,
        }
    }

    /// Check `input` against the configured limits.
    pub fn validate(&self, input: &MeetingInput) -> Result<(), MeetingError> {
        let limits = &self.limits;
        let title_chars = input.title.trim().chars().count();
        if title_chars == 0 {
            return Err(MeetingError::Validation("title must not be empty".to_string()));
        }
        if title_chars > limits.max_title_chars {
            return Err(MeetingError::Validation(format!(
                "title exceeds {} characters",
                limits.max_title_chars
            )));
        }
        if input.participants.is_empty() {
            return Err(MeetingError::Validation(
                "at least one participant is required".to_string(),
            ));
        }
        if input.participants.len() > limits.max_participants {
            return Err(MeetingError::Validation(format!(
                "at most {} participants are allowed",
                limits.max_participants
            )));
        }
        for name in &input.participants {
            let chars = name.trim().chars().count();
            if chars == 0 {
                return Err(MeetingError::Validation(
                    "participant names must not be blank".to_string(),
                ));
            }
            if chars > limits.max_name_chars {
                return Err(MeetingError::Validation(format!(
                    "participant name exceeds {} characters",
                    limits.max_name_chars
                )));
            }
        }
        if input.notes.chars().count() > limits.max_transcript_chars {
            return Err(MeetingError::Validation(format!(
                "notes exceed {} characters",
                limits.max_transcript_chars
            )));
        }
        Ok(())
    }

    /// Validate, store in `processing` and enqueue for the coordinator.
    #[tracing::instrument(
        name = "create_meeting",
        skip(self, input),
        fields(participant_count = input.participants.len())
    )]
    pub async fn create(&self, input: MeetingInput) -> Result<MeetingReceipt, MeetingError> {
        self.validate(&input)?;

        let mut meeting = Meeting {
            id: Uuid::now_v7(),
            title: input.title.trim().to_string(),
            participants: input
                .participants
                .iter()
                .map(|p| p.trim().to_string())
                .collect(),
            meeting_date: input.meeting_date,
            notes: input.notes,
            summary: None,
            status: MeetingStatus::Processing,
            created_at: Utc::now(),
        };
        self.meetings.create(&meeting).await?;

        if let Err(e) = self.queue.submit(meeting.id).await {
            error!(meeting_id = %meeting.id, "processing queue closed; marking meeting failed");
            meeting.status = MeetingStatus::Failed;
            self.meetings.update(&meeting).await?;
            return Err(e);
        }

        info!(meeting_id = %meeting.id, "meeting accepted for processing");
        Ok(MeetingReceipt {
            meeting_id: meeting.id,
            status: meeting.status,
        })
    }

    pub async fn get(&self, id: &Uuid) -> Result<Meeting, MeetingError> {
        self.meetings.get(id).await?.ok_or(MeetingError::NotFound)
    }

    /// Meetings newest first by meeting date, optionally restricted to those
    /// with a participant containing `participant` (case-insensitive).
    pub async fn list(&self, participant: Option<&str>) -> Result<Vec<Meeting>, MeetingError> {
        let needle = participant
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());
        let mut meetings: Vec<Meeting> = self
            .meetings
            .list()
            .await?
            .into_iter()
            .filter(|m| {
                needle.as_ref().is_none_or(|needle| {
                    m.participants
                        .iter()
                        .any(|p| p.to_lowercase().contains(needle.as_str()))
                })
            })
            .collect();
        meetings.sort_by(|a, b| b.meeting_date.cmp(&a.meeting_date));
        Ok(meetings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tokio::sync::mpsc;

    use crate::test_support::MemMeetingRepo;

    fn input(title: &str, participants: &[&str], notes: &str) -> MeetingInput {
        MeetingInput {
            title: title.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            meeting_date: Utc.with_ymd_and_hms(2026, 2, 10, 10, 0, 0).unwrap(),
            notes: notes.to_string(),
        }
    }

    /// A service whose queue is drained by the returned receiver.
    fn service() -> (MeetingService<MemMeetingRepo>, mpsc::Receiver<Uuid>) {
        let (sender, receiver) = mpsc::channel(8);
        let queue = ProcessingQueue::from_sender(sender);
        (
            MeetingService::new(
                Arc::new(MemMeetingRepo::default()),
                queue,
                LimitsConfig::default(),
            ),
            receiver,
        )
    }

    #[tokio::test]
    async fn test_create_enqueues_processing_meeting() {
        let (service, mut receiver) = service();
        let receipt = service
            .create(input(" Sync ", &["Alice ", "Bob"], "Alice: hi"))
            .await
            .unwrap();
        assert_eq!(receipt.status, MeetingStatus::Processing);
        assert_eq!(receiver.recv().await, Some(receipt.meeting_id));

        let stored = service.get(&receipt.meeting_id).await.unwrap();
        assert_eq!(stored.title, "Sync");
        assert_eq!(stored.participants, vec!["Alice", "Bob"]);
        assert_eq!(stored.status, MeetingStatus::Processing);
    }

    #[tokio::test]
    async fn test_validation_limits() {
        let (service, _receiver) = service();
        let long_title = "t".repeat(201);
        let long_name = "n".repeat(101);
        let too_many: Vec<String> = (0..51).map(|i| format!("P{i}")).collect();
        let too_many: Vec<&str> = too_many.iter().map(String::as_str).collect();
        let long_notes = "x".repeat(50_001);

        for bad in [
            input("", &["Alice"], "notes"),
            input(&long_title, &["Alice"], "notes"),
            input("Sync", &[], "notes"),
            input("Sync", &too_many, "notes"),
            input("Sync", &["Alice", "  "], "notes"),
            input("Sync", &[long_name.as_str()], "notes"),
            input("Sync", &["Alice"], &long_notes),
        ] {
            assert!(matches!(
                service.create(bad).await,
                Err(MeetingError::Validation(_))
            ));
        }

        let title = "t".repeat(200);
        let notes = "x".repeat(50_000);
        assert!(service.validate(&input(&title, &["Alice"], &notes)).is_ok());
    }

    #[tokio::test]
    async fn test_closed_queue_fails_meeting() {
        let (service, receiver) = service();
        drop(receiver);
        let result = service.create(input("Sync", &["Alice"], "notes")).await;
        assert!(matches!(result, Err(MeetingError::QueueClosed)));

        let listed = service.list(None).await.unwrap();
        assert_eq!(listed[0].status, MeetingStatus::Failed);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let (service, _receiver) = service();
        let mut older = input("Older", &["Alice Chen", "Bob"], "a");
        older.meeting_date -= Duration::days(3);
        service.create(older).await.unwrap();
        service.create(input("Newer", &["Carol", "Bob"], "b")).await.unwrap();

        let all = service.list(None).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);

        let alice = service.list(Some("alice")).await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].title, "Older");
        assert_eq!(service.list(Some("bob")).await.unwrap().len(), 2);
        assert!(service.list(Some("zed")).await.unwrap().is_empty());

        assert!(matches!(
            service.get(&Uuid::now_v7()).await,
            Err(MeetingError::NotFound)
        ));
    }
}
