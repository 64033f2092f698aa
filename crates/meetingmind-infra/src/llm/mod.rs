//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](meetingmind_core::llm::provider::LlmProvider)
//! used by MeetingMind and a factory ([`create_provider`]) that builds it from
//! the `[llm]` config section.

pub mod openai_compat;

use meetingmind_core::llm::box_provider::BoxLlmProvider;
use meetingmind_types::config::LlmConfig;
use meetingmind_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create the configured provider, or `None` when no usable credential is
/// set and components should run offline.
pub fn create_provider(config: &LlmConfig) -> Result<Option<BoxLlmProvider>, LlmError> {
    Ok(OpenAiCompatibleProvider::from_config(config)?.map(BoxLlmProvider::new))
}
