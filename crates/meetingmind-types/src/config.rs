//! Application configuration types for MeetingMind.
//!
//! `AppConfig` represents the top-level `config.toml`. Every field has a
//! default so an empty file (or no file) yields a working local setup:
//! in-process memory index, offline model fallback, port 8000.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub briefing: BriefingConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Which memory store implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryBackend {
    /// In-process lexical index.
    #[default]
    Local,
    /// Hosted memory service over HTTP.
    Hosted,
}

impl fmt::Display for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryBackend::Local => write!(f, "local"),
            MemoryBackend::Hosted => write!(f, "hosted"),
        }
    }
}

impl std::str::FromStr for MemoryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            // "mock" and "cloud" are accepted for older deployments.
            "local" | "mock" => Ok(MemoryBackend::Local),
            "hosted" | "cloud" => Ok(MemoryBackend::Hosted),
            other => Err(format!("invalid memory backend: '{other}'")),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub backend: MemoryBackend,
    #[serde(default = "default_memory_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per hosted call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_memory_base_url() -> String {
    "https://api.evermind.ai".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: MemoryBackend::default(),
            base_url: default_memory_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl fmt::Debug for MemoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model used for summaries and commitment extraction.
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,
    /// Model used for streamed briefings.
    #[serde(default = "default_stream_model")]
    pub stream_model: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per model call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay unit between retries; attempt `n` waits `n * retry_backoff_ms`.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_llm_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

fn default_analysis_model() -> String {
    "gpt-4o".to_string()
}

fn default_stream_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    60
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl LlmConfig {
    /// Whether a usable credential is configured.
    ///
    /// Placeholder values (anything containing `your`) never count. Against
    /// the default OpenAI endpoint the key must also carry the `sk-` prefix;
    /// custom endpoints accept any non-empty key.
    pub fn has_credentials(&self) -> bool {
        let Some(key) = self.api_key.as_deref().map(str::trim) else {
            return false;
        };
        if key.is_empty() || key.to_lowercase().contains("your") {
            return false;
        }
        if self.base_url.trim_end_matches('/') == DEFAULT_LLM_BASE_URL {
            return key.starts_with("sk-");
        }
        true
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            analysis_model: default_analysis_model(),
            stream_model: default_stream_model(),
            timeout_secs: default_llm_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("analysis_model", &self.analysis_model)
            .field("stream_model", &self.stream_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

/// Input bounds enforced at intake and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,
    #[serde(default = "default_max_participants")]
    pub max_participants: usize,
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,
    #[serde(default = "default_max_transcript_chars")]
    pub max_transcript_chars: usize,
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

fn default_max_title_chars() -> usize {
    200
}

fn default_max_participants() -> usize {
    50
}

fn default_max_name_chars() -> usize {
    100
}

fn default_max_transcript_chars() -> usize {
    50_000
}

fn default_max_query_chars() -> usize {
    1_000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_title_chars: default_max_title_chars(),
            max_participants: default_max_participants(),
            max_name_chars: default_max_name_chars(),
            max_transcript_chars: default_max_transcript_chars(),
            max_query_chars: default_max_query_chars(),
        }
    }
}

/// Pacing of the offline briefing narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingConfig {
    #[serde(default = "default_char_delay_ms")]
    pub char_delay_ms: u64,
    #[serde(default = "default_section_delay_ms")]
    pub section_delay_ms: u64,
}

fn default_char_delay_ms() -> u64 {
    10
}

fn default_section_delay_ms() -> u64 {
    300
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: default_char_delay_ms(),
            section_delay_ms: default_section_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Meetings processed concurrently by the worker.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Pending jobs buffered before intake waits.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            queue_capacity: default_queue_capacity(),
        }
    }
}
