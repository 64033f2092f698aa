//! HTTP/REST API layer for MeetingMind.
//!
//! Axum-based REST API under `/api/` with a JSON error body and CORS support.

pub mod error;
pub mod handlers;
pub mod router;
