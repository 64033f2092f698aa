//! Shared test doubles: a scripted LLM provider, failing and gated memory
//! stores, and map-backed repositories.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Notify, Semaphore};
use uuid::Uuid;

use meetingmind_types::commitment::{Commitment, CommitmentDirection, CommitmentStatus};
use meetingmind_types::error::{MemoryStoreError, RepositoryError};
use meetingmind_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent, Usage,
};
use meetingmind_types::meeting::{Meeting, MeetingStatus};
use meetingmind_types::memory::{MemoryItem, MemoryRecord, SearchQuery, SearchResponse, StoreAck};

use crate::commitment::repository::CommitmentRepository;
use crate::llm::provider::{LlmEventStream, LlmProvider};
use crate::meeting::repository::MeetingRepository;
use crate::memory::local::LocalMemoryIndex;
use crate::memory::store::MemoryStore;

enum Reply {
    Text(String),
    Fail(String),
}

/// Provider that answers `complete` calls from a queue and streams fixed
/// chunks. An exhausted queue answers `[]`.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    chunks: Vec<String>,
    stream_error: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    fn with_replies(replies: VecDeque<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            chunks: Vec::new(),
            stream_error: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(replies.into_iter().map(|s| Reply::Text(s.into())).collect())
    }

    pub fn failing(message: &str) -> Self {
        Self::with_replies(VecDeque::from([
            Reply::Fail(message.to_string()),
            Reply::Fail(message.to_string()),
            Reply::Fail(message.to_string()),
        ]))
        .with_stream_error(message)
    }

    pub fn streaming<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut provider = Self::with_replies(VecDeque::new());
        provider.chunks = chunks.into_iter().map(Into::into).collect();
        provider
    }

    pub fn with_stream_error(mut self, message: &str) -> Self {
        self.stream_error = Some(message.to_string());
        self
    }

    /// Handle to every request received, kept valid after boxing.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        async move {
            match reply {
                Some(Reply::Fail(message)) => Err(LlmError::Unavailable(message)),
                Some(Reply::Text(content)) => Ok(response(content)),
                None => Ok(response("[]".to_string())),
            }
        }
    }

    fn stream(&self, request: CompletionRequest) -> LlmEventStream {
        self.requests.lock().unwrap().push(request);
        let chunks = self.chunks.clone();
        let error = self.stream_error.clone();
        Box::pin(async_stream::stream! {
            for text in chunks {
                yield Ok(StreamEvent::TextDelta { text });
            }
            if let Some(message) = error {
                yield Err(LlmError::Stream(message));
                return;
            }
            yield Ok(StreamEvent::MessageDelta { stop_reason: StopReason::EndTurn });
            yield Ok(StreamEvent::Usage(Usage { input_tokens: 40, output_tokens: 12 }));
            yield Ok(StreamEvent::Done);
        })
    }
}

fn response(content: String) -> CompletionResponse {
    CompletionResponse {
        content,
        stop_reason: StopReason::EndTurn,
        usage: Usage::default(),
    }
}

/// Memory store whose every call fails as unreachable.
pub struct FailingMemoryStore;

impl MemoryStore for FailingMemoryStore {
    fn backend(&self) -> &str {
        "failing"
    }

    async fn store(&self, _record: &MemoryRecord) -> Result<StoreAck, MemoryStoreError> {
        Err(MemoryStoreError::UpstreamUnavailable("connection refused".to_string()))
    }

    async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, MemoryStoreError> {
        Err(MemoryStoreError::UpstreamUnavailable("connection refused".to_string()))
    }

    async fn list_recent(
        &self,
        _user_id: Option<&str>,
        _memory_type: &str,
        _limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryStoreError> {
        Err(MemoryStoreError::UpstreamUnavailable("connection refused".to_string()))
    }
}

/// Memory store that rejects writes for one meeting and accepts the rest.
pub struct SelectiveMemoryStore {
    failing_group: String,
    inner: LocalMemoryIndex,
}

impl SelectiveMemoryStore {
    pub fn failing_for(meeting_id: Uuid) -> Self {
        Self {
            failing_group: meeting_id.to_string(),
            inner: LocalMemoryIndex::new(),
        }
    }
}

impl MemoryStore for SelectiveMemoryStore {
    fn backend(&self) -> &str {
        "selective"
    }

    async fn store(&self, record: &MemoryRecord) -> Result<StoreAck, MemoryStoreError> {
        if record.group_id == self.failing_group {
            return Err(MemoryStoreError::UpstreamUnavailable("write rejected".to_string()));
        }
        self.inner.store(record).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, MemoryStoreError> {
        self.inner.search(query).await
    }

    async fn list_recent(
        &self,
        user_id: Option<&str>,
        memory_type: &str,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryStoreError> {
        self.inner.list_recent(user_id, memory_type, limit).await
    }
}

/// Memory store whose writes park until `gate` gets permits. `entered` is
/// notified on every write.
pub struct GatedMemoryStore {
    pub entered: Arc<Notify>,
    pub gate: Arc<Semaphore>,
    inner: LocalMemoryIndex,
}

impl Default for GatedMemoryStore {
    fn default() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            gate: Arc::new(Semaphore::new(0)),
            inner: LocalMemoryIndex::new(),
        }
    }
}

impl MemoryStore for GatedMemoryStore {
    fn backend(&self) -> &str {
        "gated"
    }

    async fn store(&self, record: &MemoryRecord) -> Result<StoreAck, MemoryStoreError> {
        self.entered.notify_one();
        let _permit = self.gate.acquire().await.unwrap();
        self.inner.store(record).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, MemoryStoreError> {
        self.inner.search(query).await
    }

    async fn list_recent(
        &self,
        user_id: Option<&str>,
        memory_type: &str,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryStoreError> {
        self.inner.list_recent(user_id, memory_type, limit).await
    }
}

#[derive(Default)]
pub struct MemCommitmentRepo {
    items: DashMap<Uuid, Commitment>,
}

impl CommitmentRepository for MemCommitmentRepo {
    async fn create(&self, commitment: &Commitment) -> Result<(), RepositoryError> {
        self.items.insert(commitment.id, commitment.clone());
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Commitment>, RepositoryError> {
        Ok(self.items.get(id).map(|c| c.clone()))
    }

    async fn list(&self) -> Result<Vec<Commitment>, RepositoryError> {
        Ok(self.items.iter().map(|c| c.value().clone()).collect())
    }

    async fn update(&self, commitment: &Commitment) -> Result<(), RepositoryError> {
        match self.items.get_mut(&commitment.id) {
            Some(mut entry) => {
                *entry = commitment.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default)]
pub struct MemMeetingRepo {
    items: DashMap<Uuid, Meeting>,
}

impl MeetingRepository for MemMeetingRepo {
    async fn create(&self, meeting: &Meeting) -> Result<(), RepositoryError> {
        self.items.insert(meeting.id, meeting.clone());
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Meeting>, RepositoryError> {
        Ok(self.items.get(id).map(|m| m.clone()))
    }

    async fn list(&self) -> Result<Vec<Meeting>, RepositoryError> {
        Ok(self.items.iter().map(|m| m.value().clone()).collect())
    }

    async fn update(&self, meeting: &Meeting) -> Result<(), RepositoryError> {
        match self.items.get_mut(&meeting.id) {
            Some(mut entry) => {
                *entry = meeting.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

pub fn commitment(description: &str, owner: &str, recipient: &str) -> Commitment {
    Commitment {
        id: Uuid::now_v7(),
        description: description.to_string(),
        owner: owner.to_string(),
        recipient: recipient.to_string(),
        direction: CommitmentDirection::SelfOwed,
        due_date: None,
        status: CommitmentStatus::Pending,
        meeting_id: Uuid::now_v7(),
        meeting_title: "Weekly Sync".to_string(),
        created_at: Utc::now(),
        completed_at: None,
    }
}

pub fn meeting(title: &str, participants: &[&str], notes: &str) -> Meeting {
    Meeting {
        id: Uuid::now_v7(),
        title: title.to_string(),
        participants: participants.iter().map(|p| p.to_string()).collect(),
        meeting_date: Utc::now(),
        notes: notes.to_string(),
        summary: None,
        status: MeetingStatus::Processing,
        created_at: Utc::now(),
    }
}
