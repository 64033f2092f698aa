//! Infrastructure layer for MeetingMind.
//!
//! Implements the ports defined in `meetingmind-core`: DashMap-backed
//! meeting and commitment repositories, the hosted memory service client and
//! an OpenAI-compatible LLM provider. Also loads `config.toml`.

pub mod config;
pub mod llm;
pub mod memory;
pub mod store;

#[cfg(test)]
pub(crate) mod test_server;
