//! LLM provider abstractions for MeetingMind.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for runtime provider selection
//! - `ModelSelection`: a provider plus the model name a component should use

use std::sync::Arc;

use tracing::{debug, warn};

use meetingmind_types::llm::{CompletionResponse, StopReason};

pub mod box_provider;
pub mod provider;

use box_provider::BoxLlmProvider;

/// Provider and model for one use (analysis or streaming).
///
/// `provider` is `None` when no credentials are configured; components then
/// take their deterministic offline path.
#[derive(Clone, Default)]
pub struct ModelSelection {
    pub provider: Option<Arc<BoxLlmProvider>>,
    pub model: String,
}

impl ModelSelection {
    pub fn new(provider: Option<Arc<BoxLlmProvider>>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn provider(&self) -> Option<&BoxLlmProvider> {
        self.provider.as_deref()
    }
}

/// Log token usage for a finished completion, warning when the reply was
/// cut off by the token limit.
pub fn log_completion(purpose: &str, response: &CompletionResponse) {
    debug!(
        purpose,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        stop_reason = %response.stop_reason,
        "completion finished"
    );
    if response.stop_reason == StopReason::MaxTokens {
        warn!(purpose, "completion truncated at max_tokens; output may be incomplete");
    }
}
