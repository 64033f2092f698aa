//! Hosted memory service client.
//!
//! REST proxy to an EverMemOS-style service at `{base_url}/api/v0`:
//! - store: `POST /memories`
//! - search: `GET /memories/search` with a JSON body
//! - recent: `GET /memories?memory_type=&limit=&user_id=`
//!
//! Transport errors, timeouts, 429 and 5xx responses are retried up to
//! `max_attempts` times with linear backoff. Other 4xx responses fail at once.
//! Retrying a store is safe only because the service deduplicates writes by
//! `message_id`, which is derived from the meeting id and participant index.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use meetingmind_core::memory::store::MemoryStore;
use meetingmind_types::config::MemoryConfig;
use meetingmind_types::error::MemoryStoreError;
use meetingmind_types::memory::{
    MemoryGroup, MemoryItem, MemoryRecord, SearchQuery, SearchResponse, StoreAck,
};

const API_PREFIX: &str = "/api/v0";
const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Serialize)]
struct StorePayload<'a> {
    message_id: &'a str,
    create_time: &'a str,
    sender: &'a str,
    content: &'a str,
    group_id: &'a str,
    group_name: &'a str,
    sender_name: &'a str,
    role: &'static str,
}

impl<'a> From<&'a MemoryRecord> for StorePayload<'a> {
    fn from(record: &'a MemoryRecord) -> Self {
        Self {
            message_id: &record.message_id,
            create_time: &record.timestamp,
            sender: &record.sender_id,
            content: &record.content,
            group_id: &record.group_id,
            group_name: &record.group_name,
            sender_name: &record.sender_name,
            role: "user",
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    query: &'a str,
    top_k: usize,
    retrieve_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_types: Option<&'a [String]>,
}

impl<'a> From<&'a SearchQuery> for SearchPayload<'a> {
    fn from(query: &'a SearchQuery) -> Self {
        Self {
            query: &query.query,
            top_k: query.top_k,
            retrieve_method: query.method.to_string(),
            user_id: query.user_id.as_deref(),
            group_id: query.group_id.as_deref(),
            memory_types: query.memory_types.as_deref(),
        }
    }
}

/// Memory store backed by the hosted service.
pub struct HostedMemoryStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    timeout_secs: u64,
    max_attempts: u32,
    backoff: Duration,
}

impl HostedMemoryStore {
    pub fn new(config: &MemoryConfig) -> Result<Self, MemoryStoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                MemoryStoreError::UpstreamUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: format!("{}{API_PREFIX}", config.base_url.trim_end_matches('/')),
            api_key: config
                .api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .map(|k| SecretString::from(k.to_string())),
            timeout_secs: config.timeout_secs,
            max_attempts: config.max_attempts.max(1),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Override the delay unit between retries (attempt `n` waits `n * backoff`).
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }

    /// Send the request built by `build`, retrying transient failures, and
    /// return the parsed JSON body.
    async fn send<F>(&self, build: F) -> Result<Value, MemoryStoreError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut last_error = MemoryStoreError::UpstreamUnavailable("no attempt made".to_string());

        for attempt in 1..=self.max_attempts {
            match build().send().await {
                Ok(response) if response.status().is_success() => {
                    return response.json::<Value>().await.map_err(|e| {
                        MemoryStoreError::Deserialization(format!("invalid JSON body: {e}"))
                    });
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    last_error =
                        MemoryStoreError::UpstreamUnavailable(format!("HTTP {status}: {body}"));
                    if !is_retryable(status) {
                        return Err(last_error);
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = MemoryStoreError::Timeout {
                        timeout_secs: self.timeout_secs,
                    };
                }
                Err(e) => {
                    last_error = MemoryStoreError::UpstreamUnavailable(e.to_string());
                }
            }

            if attempt < self.max_attempts {
                tracing::warn!(
                    attempt,
                    max_attempts = self.max_attempts,
                    error = %last_error,
                    "hosted memory call failed, retrying"
                );
                tokio::time::sleep(self.backoff * attempt).await;
            }
        }

        Err(last_error)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// `result.memories` as `[{<type>: [items]}]` groups.
pub fn parse_search_response(body: &Value) -> Result<SearchResponse, MemoryStoreError> {
    let memories = match body.pointer("/result/memories") {
        None | Some(Value::Null) => return Ok(SearchResponse::default()),
        Some(Value::Array(memories)) => memories,
        Some(other) => {
            return Err(MemoryStoreError::Deserialization(format!(
                "expected result.memories to be an array, got {other}"
            )));
        }
    };

    let mut groups = Vec::new();
    for entry in memories {
        let Value::Object(by_type) = entry else {
            return Err(MemoryStoreError::Deserialization(
                "memory group is not an object".to_string(),
            ));
        };
        for (memory_type, items) in by_type {
            let items: Vec<MemoryItem> = serde_json::from_value(items.clone()).map_err(|e| {
                MemoryStoreError::Deserialization(format!("invalid {memory_type} items: {e}"))
            })?;
            groups.push(MemoryGroup {
                memory_type: memory_type.clone(),
                items,
            });
        }
    }
    Ok(SearchResponse { groups })
}

/// `result.memories` from the listing endpoint, either flat items or
/// grouped like a search response.
pub fn parse_memory_list(body: &Value) -> Result<Vec<MemoryItem>, MemoryStoreError> {
    let Some(Value::Array(entries)) = body.pointer("/result/memories") else {
        return Ok(Vec::new());
    };

    let grouped = entries
        .iter()
        .all(|e| e.as_object().is_some_and(|o| o.values().all(Value::is_array)));
    if grouped && !entries.is_empty() {
        let response = parse_search_response(body)?;
        return Ok(response
            .groups
            .into_iter()
            .flat_map(|group| {
                let memory_type = group.memory_type;
                group.items.into_iter().map(move |mut item| {
                    if item.memory_type.is_empty() {
                        item.memory_type = memory_type.clone();
                    }
                    item
                })
            })
            .collect());
    }

    entries
        .iter()
        .map(|entry| {
            let mut item: MemoryItem = serde_json::from_value(entry.clone())
                .map_err(|e| MemoryStoreError::Deserialization(format!("invalid memory: {e}")))?;
            // Raw records carry `content` instead of `episode`.
            if item.episode.is_empty() {
                if let Some(content) = entry.get("content").and_then(Value::as_str) {
                    item.episode = content.to_string();
                }
            }
            if item.group_name.is_empty() {
                if let Some(name) = entry.get("group_name").and_then(Value::as_str) {
                    item.group_name = name.to_string();
                }
            }
            Ok(item)
        })
        .collect()
}

fn parse_ack(body: &Value) -> StoreAck {
    StoreAck {
        status: body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("ok")
            .to_string(),
        count: body
            .pointer("/result/count")
            .and_then(Value::as_u64)
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(1),
    }
}

impl MemoryStore for HostedMemoryStore {
    fn backend(&self) -> &str {
        "hosted"
    }

    async fn store(&self, record: &MemoryRecord) -> Result<StoreAck, MemoryStoreError> {
        // A retried write resends the same message_id; the service treats it
        // as the same record.
        let payload = StorePayload::from(record);
        let body = self
            .send(|| self.request(Method::POST, "/memories").json(&payload))
            .await?;
        tracing::debug!(message_id = %record.message_id, "stored hosted memory record");
        Ok(parse_ack(&body))
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, MemoryStoreError> {
        let payload = SearchPayload::from(query);
        // The service reads the search parameters from a GET body.
        let body = self
            .send(|| self.request(Method::GET, "/memories/search").json(&payload))
            .await?;
        parse_search_response(&body)
    }

    async fn list_recent(
        &self,
        user_id: Option<&str>,
        memory_type: &str,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryStoreError> {
        let mut params: Vec<(&str, String)> = vec![
            ("memory_type", memory_type.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(user) = user_id {
            params.push(("user_id", user.to_string()));
        }
        let body = self
            .send(|| self.request(Method::GET, "/memories").query(&params))
            .await?;
        let mut items = parse_memory_list(&body)?;
        items.truncate(limit);
        Ok(items)
    }
}
