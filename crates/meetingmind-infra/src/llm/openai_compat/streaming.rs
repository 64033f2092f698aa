//! SSE stream adapter for OpenAI-compatible chat completions.
//!
//! Each `data:` line carries a [`ChatChunk`]; the literal `[DONE]` ends the
//! stream. Chunks map to provider-agnostic [`StreamEvent`]s:
//! 1. `TextDelta` for each non-empty `choices[0].delta.content`
//! 2. `MessageDelta` when a `finish_reason` appears
//! 3. `Usage` from the final usage chunk (requires `include_usage`)
//! 4. `Done` once the server signals the end
//!
//! Opening the stream is retried under the provider's [`RetryPolicy`] until
//! the server answers with an event stream. After that, errors end the
//! stream, since text already delivered cannot be taken back.

use futures_util::StreamExt;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest_eventsource::{Event, EventSource, RequestBuilderExt};
use secrecy::{ExposeSecret, SecretString};

use meetingmind_core::llm::provider::LlmEventStream;
use meetingmind_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::{ChatChunk, ChatRequest};
use super::{map_status, RetryPolicy};

const DONE_SENTINEL: &str = "[DONE]";

/// Events carried by one chunk payload.
pub fn chunk_events(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("invalid stream chunk: {e}")))?;

    let mut events = Vec::new();
    if let Some(choice) = chunk.choices.first() {
        if let Some(text) = choice.delta.content.as_ref().filter(|t| !t.is_empty()) {
            events.push(StreamEvent::TextDelta { text: text.clone() });
        }
        if let Some(reason) = choice.finish_reason.as_deref() {
            events.push(StreamEvent::MessageDelta {
                stop_reason: StopReason::from_finish_reason(Some(reason)),
            });
        }
    }
    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::Usage(Usage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }));
    }
    Ok(events)
}

fn map_stream_error(err: reqwest_eventsource::Error, timeout_secs: u64) -> LlmError {
    use reqwest_eventsource::Error;

    match err {
        Error::InvalidStatusCode(status, _) => map_status(status, String::new()),
        Error::Transport(e) if e.is_timeout() => LlmError::Timeout { timeout_secs },
        Error::Transport(e) => LlmError::Unavailable(e.to_string()),
        other => LlmError::Stream(other.to_string()),
    }
}

/// Connect and wait for the server to accept the stream, retrying
/// transient failures.
async fn open_source(
    client: &reqwest::Client,
    url: &str,
    body: &ChatRequest,
    auth: &HeaderValue,
    timeout_secs: u64,
    retry: RetryPolicy,
) -> Result<EventSource, LlmError> {
    let mut attempt = 1;
    loop {
        let mut source = client
            .post(url)
            .header(AUTHORIZATION, auth.clone())
            .json(body)
            .eventsource()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let err = match source.next().await {
            Some(Ok(Event::Open)) => return Ok(source),
            Some(Ok(Event::Message(_))) => {
                LlmError::Stream("event received before stream opened".to_string())
            }
            Some(Err(e)) => map_stream_error(e, timeout_secs),
            None => LlmError::Stream("stream closed before opening".to_string()),
        };
        source.close();

        if !retry.should_retry(attempt, &err) {
            return Err(err);
        }
        tracing::warn!(
            attempt,
            max_attempts = retry.max_attempts,
            error = %err,
            "opening model stream failed, retrying"
        );
        tokio::time::sleep(retry.delay(attempt)).await;
        attempt += 1;
    }
}

/// Open a streaming completion. The connection closes when the returned
/// stream ends or is dropped.
pub fn create_openai_stream(
    client: &reqwest::Client,
    url: &str,
    body: ChatRequest,
    api_key: &SecretString,
    timeout_secs: u64,
    retry: RetryPolicy,
) -> LlmEventStream {
    let mut auth = match HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret())) {
        Ok(value) => value,
        Err(_) => {
            let err = LlmError::InvalidRequest("API key is not a valid header value".to_string());
            return Box::pin(futures_util::stream::once(async move { Err(err) }));
        }
    };
    auth.set_sensitive(true);

    let client = client.clone();
    let url = url.to_string();

    Box::pin(async_stream::stream! {
        let mut source =
            match open_source(&client, &url, &body, &auth, timeout_secs, retry).await {
                Ok(source) => source,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(message)) => {
                    if message.data.trim() == DONE_SENTINEL {
                        break;
                    }
                    match chunk_events(&message.data) {
                        Ok(events) => {
                            for event in events {
                                yield Ok(event);
                            }
                        }
                        Err(e) => {
                            source.close();
                            yield Err(e);
                            return;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(e) => {
                    source.close();
                    yield Err(map_stream_error(e, timeout_secs));
                    return;
                }
            }
        }
        source.close();
        yield Ok(StreamEvent::Done);
    })
}
