//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use meetingmind_types::error::{CommitmentError, MeetingError, MemoryStoreError, SearchError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Meeting(MeetingError),
    Commitment(CommitmentError),
    Search(SearchError),
    /// Request rejected before reaching a service.
    Validation(String),
}

impl From<MeetingError> for AppError {
    fn from(e: MeetingError) -> Self {
        AppError::Meeting(e)
    }
}

impl From<CommitmentError> for AppError {
    fn from(e: CommitmentError) -> Self {
        AppError::Commitment(e)
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        AppError::Search(e)
    }
}

fn upstream(e: &MemoryStoreError) -> (StatusCode, &'static str) {
    match e {
        MemoryStoreError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
        MemoryStoreError::UpstreamUnavailable(_) => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE")
        }
        MemoryStoreError::Deserialization(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
    }
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Meeting(MeetingError::NotFound) => {
                (StatusCode::NOT_FOUND, "MEETING_NOT_FOUND")
            }
            AppError::Meeting(MeetingError::Validation(_)) | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Meeting(MeetingError::QueueClosed) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SHUTTING_DOWN")
            }
            AppError::Meeting(MeetingError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            AppError::Commitment(CommitmentError::NotFound) => {
                (StatusCode::NOT_FOUND, "COMMITMENT_NOT_FOUND")
            }
            AppError::Commitment(CommitmentError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            AppError::Search(SearchError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Search(SearchError::Memory(e)) => upstream(e),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Meeting(e) => e.to_string(),
            AppError::Commitment(e) => e.to_string(),
            AppError::Search(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        }

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}
