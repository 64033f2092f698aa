//! OpenAI-compatible LLM provider.
//!
//! Talks to any endpoint implementing `POST {base_url}/chat/completions`
//! (OpenAI itself, or a self-hosted gateway) over `reqwest`, with SSE
//! streaming through `reqwest-eventsource`.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when building
//! the `Authorization` header.
//!
//! Transient failures (transport errors, timeouts, 429 and 5xx) are retried
//! up to `max_attempts` times with linear backoff. A stream is only retried
//! while opening; once the server has accepted it, errors end the stream.

pub mod streaming;
pub mod types;

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use meetingmind_core::llm::provider::{LlmEventStream, LlmProvider};
use meetingmind_types::config::{LlmConfig, DEFAULT_LLM_BASE_URL};
use meetingmind_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use self::streaming::create_openai_stream;
use self::types::{ChatMessage, ChatRequest, ChatResponse, StreamOptions};

/// Bounded retry settings for model calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts including the first; at least 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Whether a failed attempt number `attempt` (1-based) should be retried.
    pub fn should_retry(&self, attempt: u32, err: &LlmError) -> bool {
        attempt < self.max_attempts && err.is_transient()
    }

    /// Delay before the attempt after `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Provider for OpenAI-compatible chat completion APIs.
///
/// Does not implement `Debug`; the only secret it holds is the API key.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    default_model: String,
    timeout_secs: u64,
    provider_name: String,
    retry: RetryPolicy,
}

impl OpenAiCompatibleProvider {
    /// Build a provider with `default_model` used when a request leaves the
    /// model empty.
    pub fn new(
        api_key: SecretString,
        base_url: &str,
        default_model: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let provider_name = if base_url == DEFAULT_LLM_BASE_URL {
            "openai"
        } else {
            "openai-compatible"
        };

        Ok(Self {
            client,
            api_key,
            base_url,
            default_model: default_model.to_string(),
            timeout_secs,
            provider_name: provider_name.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build from the `[llm]` config section. `None` when no usable key is
    /// configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
        if !config.has_credentials() {
            return Ok(None);
        }
        let Some(key) = config.api_key.as_deref() else {
            return Ok(None);
        };
        Self::new(
            SecretString::from(key.trim().to_string()),
            &config.base_url,
            &config.analysis_model,
            config.timeout_secs,
        )
        .map(|provider| {
            Some(provider.with_retry(RetryPolicy::new(
                config.max_attempts,
                Duration::from_millis(config.retry_backoff_ms),
            )))
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_request(&self, request: &CompletionRequest, stream: bool) -> ChatRequest {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        }];

        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        ChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
            stream_options: stream.then_some(StreamOptions {
                include_usage: true,
            }),
        }
    }

    async fn complete_once(&self, body: &ChatRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = chat.choices.first();
        let content = choice
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        let stop_reason = choice
            .map(|c| StopReason::from_finish_reason(c.finish_reason.as_deref()))
            .unwrap_or(StopReason::EndTurn);
        let usage = chat
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            stop_reason,
            usage,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            LlmError::Unavailable(format!("HTTP request failed: {err}"))
        }
    }
}

/// Map a non-success HTTP status to an [`LlmError`].
pub(crate) fn map_status(status: StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        400 | 404 | 422 => LlmError::InvalidRequest(format!("HTTP {status}: {body}")),
        500..=599 => LlmError::Unavailable(format!("HTTP {status}: {body}")),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(request, false);

        let mut attempt = 1;
        loop {
            match self.complete_once(&body).await {
                Ok(response) => return Ok(response),
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %e,
                        "model call failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn stream(&self, request: CompletionRequest) -> LlmEventStream {
        let body = self.build_request(&request, true);
        create_openai_stream(
            &self.client,
            &self.url("/chat/completions"),
            body,
            &self.api_key,
            self.timeout_secs,
            self.retry,
        )
    }
}
