use thiserror::Error;

/// Errors related to meeting intake and lookup.
#[derive(Debug, Error)]
pub enum MeetingError {
    #[error("meeting not found")]
    NotFound,

    #[error("invalid meeting input: {0}")]
    Validation(String),

    #[error("processing queue closed")]
    QueueClosed,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to commitment operations.
#[derive(Debug, Error)]
pub enum CommitmentError {
    #[error("commitment not found")]
    NotFound,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from a memory store backend.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("memory backend unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("memory backend timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("unexpected memory backend response: {0}")]
    Deserialization(String),
}

/// Errors from memory search and briefing requests.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search input: {0}")]
    Validation(String),

    #[error(transparent)]
    Memory(#[from] MemoryStoreError),
}

/// Errors from repository operations (used by trait definitions in meetingmind-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for MeetingError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => MeetingError::NotFound,
            other => MeetingError::StorageError(other.to_string()),
        }
    }
}

impl From<RepositoryError> for CommitmentError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => CommitmentError::NotFound,
            other => CommitmentError::StorageError(other.to_string()),
        }
    }
}
