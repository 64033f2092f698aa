//! Business logic and port traits for MeetingMind.
//!
//! This crate defines the "ports" (repository, memory store and LLM provider
//! traits) that the infrastructure layer implements, plus the meeting
//! pipeline, commitment lifecycle and briefing orchestration built on them.
//! It depends only on `meetingmind-types`, never on `meetingmind-infra`.

pub mod briefing;
pub mod commitment;
pub mod contact;
pub mod llm;
pub mod meeting;
pub mod memory;
pub mod search;
pub mod time;

#[cfg(test)]
pub(crate) mod test_support;
