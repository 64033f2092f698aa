//! Meeting lifecycle coordinator.
//!
//! Drives one meeting from `processing` to a terminal state:
//! 1. store one memory record per participant carrying the full transcript
//! 2. summarize the transcript onto the meeting
//! 3. classify commitments and persist them
//! 4. mark the meeting `completed`
//!
//! Any error in steps 1-3 turns the meeting `failed`. Errors never escape
//! [`MeetingCoordinator::process`], which runs detached from the request
//! that created the meeting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use meetingmind_types::error::{CommitmentError, MeetingError, MemoryStoreError};
use meetingmind_types::llm::LlmError;
use meetingmind_types::meeting::{Meeting, MeetingStatus};
use meetingmind_types::memory::{MemoryRecord, DEFAULT_MEMORY_TYPE};

use crate::commitment::classifier::{into_commitment, CommitmentClassifier};
use crate::commitment::manager::CommitmentManager;
use crate::commitment::repository::CommitmentRepository;
use crate::llm::ModelSelection;
use crate::memory::store::BoxMemoryStore;

use super::repository::MeetingRepository;
use super::summarizer::MeetingSummarizer;

/// Any failure inside the processing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("memory ingestion failed: {0}")]
    Memory(#[from] MemoryStoreError),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("commitment persistence failed: {0}")]
    Commitment(#[from] CommitmentError),

    #[error("meeting persistence failed: {0}")]
    Meeting(#[from] MeetingError),
}

impl From<meetingmind_types::error::RepositoryError> for PipelineError {
    fn from(e: meetingmind_types::error::RepositoryError) -> Self {
        PipelineError::Meeting(e.into())
    }
}

/// Sender id for a participant: lowercased, spaces replaced by `_`.
pub fn sender_id(participant: &str) -> String {
    participant.to_lowercase().replace(' ', "_")
}

/// One memory record per participant, each carrying the full transcript.
pub fn memory_records(meeting: &Meeting) -> Vec<MemoryRecord> {
    let timestamp = meeting.meeting_date.to_rfc3339();
    meeting
        .participants
        .iter()
        .enumerate()
        .map(|(index, participant)| MemoryRecord {
            message_id: format!("{}_{index}", meeting.id),
            timestamp: timestamp.clone(),
            sender_id: sender_id(participant),
            sender_name: participant.clone(),
            content: meeting.notes.clone(),
            group_id: meeting.id.to_string(),
            group_name: meeting.title.clone(),
            memory_type: DEFAULT_MEMORY_TYPE.to_string(),
        })
        .collect()
}

/// Runs the processing pipeline for individual meetings.
///
/// Generic over the meeting and commitment repositories; the memory store
/// and model are chosen at startup and passed in boxed.
pub struct MeetingCoordinator<M: MeetingRepository, C: CommitmentRepository> {
    meetings: Arc<M>,
    commitments: Arc<CommitmentManager<C>>,
    memory: Arc<BoxMemoryStore>,
    analysis: ModelSelection,
}

impl<M: MeetingRepository, C: CommitmentRepository> MeetingCoordinator<M, C> {
    pub fn new(
        meetings: Arc<M>,
        commitments: Arc<CommitmentManager<C>>,
        memory: Arc<BoxMemoryStore>,
        analysis: ModelSelection,
    ) -> Self {
        Self {
            meetings,
            commitments,
            memory,
            analysis,
        }
    }

    /// Process one meeting to a terminal state.
    ///
    /// Returns the resulting status, or `None` when the job was skipped
    /// (unknown meeting, or one already in a terminal state).
    #[tracing::instrument(name = "process_meeting", skip_all, fields(meeting_id = %meeting_id))]
    pub async fn process(&self, meeting_id: Uuid) -> Option<MeetingStatus> {
        let mut meeting = match self.meetings.get(&meeting_id).await {
            Ok(Some(meeting)) => meeting,
            Ok(None) => {
                warn!("meeting not found; skipping job");
                return None;
            }
            Err(e) => {
                error!(error = %e, "failed to load meeting; skipping job");
                return None;
            }
        };

        if meeting.status.is_terminal() {
            warn!(status = %meeting.status, "meeting already terminal; skipping job");
            return None;
        }

        let status = match self.run_pipeline(&mut meeting).await {
            Ok(commitment_count) => {
                info!(commitment_count, "meeting processed");
                MeetingStatus::Completed
            }
            Err(e) => {
                error!(error = %e, "meeting processing failed");
                MeetingStatus::Failed
            }
        };

        meeting.status = status;
        if let Err(e) = self.meetings.update(&meeting).await {
            error!(error = %e, "failed to record terminal meeting status");
        }
        Some(status)
    }

    /// Mark a meeting that will never be processed as `failed`. Meetings
    /// already in a terminal state are left alone.
    pub async fn abandon(&self, meeting_id: Uuid) {
        match self.meetings.get(&meeting_id).await {
            Ok(Some(mut meeting)) if !meeting.status.is_terminal() => {
                meeting.status = MeetingStatus::Failed;
                match self.meetings.update(&meeting).await {
                    Ok(()) => warn!(%meeting_id, "queued meeting abandoned; marked failed"),
                    Err(e) => error!(%meeting_id, error = %e, "failed to mark abandoned meeting"),
                }
            }
            Ok(_) => {}
            Err(e) => error!(%meeting_id, error = %e, "failed to load abandoned meeting"),
        }
    }

    async fn run_pipeline(&self, meeting: &mut Meeting) -> Result<usize, PipelineError> {
        for record in memory_records(meeting) {
            self.memory.store(&record).await?;
        }

        let provider = self.analysis.provider();

        let summary =
            MeetingSummarizer::summarize(provider, &self.analysis.model, &meeting.notes).await?;
        meeting.summary = Some(summary);
        self.meetings.update(meeting).await?;

        let raws = CommitmentClassifier::extract(
            provider,
            &self.analysis.model,
            &meeting.notes,
            &meeting.participants,
        )
        .await?;

        let now = Utc::now();
        let count = raws.len();
        for raw in raws {
            let commitment =
                into_commitment(raw, &meeting.participants, meeting.id, &meeting.title, now);
            self.commitments.create(commitment).await?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::memory::local::LocalMemoryIndex;
    use crate::test_support::{
        meeting, FailingMemoryStore, MemCommitmentRepo, MemMeetingRepo, ScriptedProvider,
    };
    use meetingmind_types::commitment::{CommitmentDirection, CommitmentFilter};
    use meetingmind_types::memory::SearchQuery;

    struct Harness {
        meetings: Arc<MemMeetingRepo>,
        commitments: Arc<CommitmentManager<MemCommitmentRepo>>,
        memory: Arc<BoxMemoryStore>,
        coordinator: MeetingCoordinator<MemMeetingRepo, MemCommitmentRepo>,
    }

    fn harness(memory: BoxMemoryStore, provider: Option<ScriptedProvider>) -> Harness {
        let meetings = Arc::new(MemMeetingRepo::default());
        let commitments = Arc::new(CommitmentManager::new(MemCommitmentRepo::default()));
        let memory = Arc::new(memory);
        let analysis = ModelSelection::new(
            provider.map(|p| Arc::new(BoxLlmProvider::new(p))),
            "gpt-4o",
        );
        let coordinator = MeetingCoordinator::new(
            Arc::clone(&meetings),
            Arc::clone(&commitments),
            Arc::clone(&memory),
            analysis,
        );
        Harness {
            meetings,
            commitments,
            memory,
            coordinator,
        }
    }

    const ALICE_BOB: &str = "Alice: I'll send the report by 2026-03-01. Bob: I'll review it.";

    #[test]
    fn test_memory_records_per_participant() {
        let m = meeting("Roadmap", &["Alice Chen", "Bob"], "notes");
        let records = memory_records(&m);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message_id, format!("{}_0", m.id));
        assert_eq!(records[0].sender_id, "alice_chen");
        assert_eq!(records[1].sender_name, "Bob");
        assert_eq!(records[1].group_id, m.id.to_string());
        assert_eq!(records[1].timestamp, m.meeting_date.to_rfc3339());
        assert!(records.iter().all(|r| r.content == "notes"));
    }

    #[tokio::test]
    async fn test_offline_alice_bob_pipeline() {
        let h = harness(BoxMemoryStore::new(LocalMemoryIndex::new()), None);
        let m = meeting("Report sync", &["Alice", "Bob"], ALICE_BOB);
        h.meetings.create(&m).await.unwrap();

        assert_eq!(h.coordinator.process(m.id).await, Some(MeetingStatus::Completed));

        let stored = h.meetings.get(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MeetingStatus::Completed);
        assert!(stored.summary.is_some());

        let commitments = h.commitments.list(&CommitmentFilter::default()).await.unwrap();
        assert_eq!(commitments.len(), 2);
        let alice = commitments.iter().find(|c| c.owner == "Alice").unwrap();
        assert_eq!(alice.direction, CommitmentDirection::SelfOwed);
        assert_eq!(
            alice.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2026-03-01".to_string())
        );
        assert_eq!(alice.meeting_id, m.id);
        assert_eq!(alice.meeting_title, "Report sync");
        let bob = commitments.iter().find(|c| c.owner == "Bob").unwrap();
        assert_eq!(bob.direction, CommitmentDirection::OwedToSelf);

        let hits = h.memory.search(&SearchQuery::new("report", 10)).await.unwrap();
        assert_eq!(hits.total_count(), 2);
    }

    #[tokio::test]
    async fn test_model_alice_bob_pipeline() {
        let provider = ScriptedProvider::replying([
            "Alice will send the report; Bob will review it.",
            r#"```json
[{"description": "Send the report", "owner": "Alice", "recipient": "Bob", "due_date": "2026-03-01"},
 {"description": "Review the report", "owner": "Bob", "recipient": "Alice", "due_date": null}]
```"#,
        ]);
        let h = harness(BoxMemoryStore::new(LocalMemoryIndex::new()), Some(provider));
        let m = meeting("Report sync", &["Alice", "Bob"], ALICE_BOB);
        h.meetings.create(&m).await.unwrap();

        assert_eq!(h.coordinator.process(m.id).await, Some(MeetingStatus::Completed));

        let stored = h.meetings.get(&m.id).await.unwrap().unwrap();
        assert_eq!(
            stored.summary.as_deref(),
            Some("Alice will send the report; Bob will review it.")
        );
        let commitments = h.commitments.list(&CommitmentFilter::default()).await.unwrap();
        assert_eq!(commitments.len(), 2);
        assert_eq!(commitments[0].owner, "Alice");
        assert_eq!(commitments[0].direction, CommitmentDirection::SelfOwed);
        assert_eq!(commitments[1].owner, "Bob");
        assert_eq!(commitments[1].direction, CommitmentDirection::OwedToSelf);
    }

    #[tokio::test]
    async fn test_malformed_model_output_completes_with_no_commitments() {
        let provider = ScriptedProvider::replying(["summary", "I could not find any."]);
        let h = harness(BoxMemoryStore::new(LocalMemoryIndex::new()), Some(provider));
        let m = meeting("Chat", &["Alice", "Bob"], "Alice: hi");
        h.meetings.create(&m).await.unwrap();

        assert_eq!(h.coordinator.process(m.id).await, Some(MeetingStatus::Completed));
        assert!(h.commitments.list(&CommitmentFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_failure_marks_meeting_failed() {
        let h = harness(BoxMemoryStore::new(FailingMemoryStore), None);
        let m = meeting("Doomed", &["Alice", "Bob"], ALICE_BOB);
        h.meetings.create(&m).await.unwrap();

        assert_eq!(h.coordinator.process(m.id).await, Some(MeetingStatus::Failed));
        let stored = h.meetings.get(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MeetingStatus::Failed);
        assert!(h.commitments.list(&CommitmentFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_marks_meeting_failed() {
        let h = harness(
            BoxMemoryStore::new(LocalMemoryIndex::new()),
            Some(ScriptedProvider::failing("model down")),
        );
        let m = meeting("Doomed", &["Alice"], "notes");
        h.meetings.create(&m).await.unwrap();

        assert_eq!(h.coordinator.process(m.id).await, Some(MeetingStatus::Failed));
    }

    #[tokio::test]
    async fn test_terminal_and_unknown_meetings_are_skipped() {
        let h = harness(BoxMemoryStore::new(LocalMemoryIndex::new()), None);
        let mut m = meeting("Done", &["Alice", "Bob"], ALICE_BOB);
        m.status = MeetingStatus::Completed;
        h.meetings.create(&m).await.unwrap();

        assert_eq!(h.coordinator.process(m.id).await, None);
        assert_eq!(h.coordinator.process(Uuid::now_v7()).await, None);
        assert!(h.commitments.list(&CommitmentFilter::default()).await.unwrap().is_empty());
    }
}
