//! Shared domain types for MeetingMind.
//!
//! Meetings, commitments, memory records, briefing events, LLM request shapes,
//! configuration and the error taxonomy shared by every other crate.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod briefing;
pub mod commitment;
pub mod config;
pub mod contact;
pub mod error;
pub mod llm;
pub mod meeting;
pub mod memory;
