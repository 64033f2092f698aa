//! Memory types for MeetingMind.
//!
//! Memory records are the per-participant transcript copies held by the
//! memory store. Search goes out as a [`SearchQuery`] and comes back grouped
//! by memory type ([`SearchResponse`]); callers shape that into flat
//! [`SearchResult`]s for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Memory type tag assigned to every ingested transcript record.
pub const DEFAULT_MEMORY_TYPE: &str = "episodic_memory";

/// Number of characters kept in a memory summary and used for dedup keys.
pub const SUMMARY_CHARS: usize = 200;

/// A single stored message record. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub message_id: String,
    /// RFC 3339 timestamp of the originating meeting.
    pub timestamp: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    /// Meeting id the record belongs to (the "group").
    pub group_id: String,
    /// Meeting title.
    pub group_name: String,
    pub memory_type: String,
}

/// Retrieval strategy requested from the backend.
///
/// The local index scores lexically regardless of method; the hosted
/// backend forwards the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieveMethod {
    Keyword,
    Vector,
    Hybrid,
}

impl fmt::Display for RetrieveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrieveMethod::Keyword => write!(f, "keyword"),
            RetrieveMethod::Vector => write!(f, "vector"),
            RetrieveMethod::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for RetrieveMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" => Ok(RetrieveMethod::Keyword),
            "vector" => Ok(RetrieveMethod::Vector),
            "hybrid" => Ok(RetrieveMethod::Hybrid),
            other => Err(format!("invalid retrieve method: '{other}'")),
        }
    }
}

/// Parameters of a memory search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// Contact filter. Boosts (local) or scopes (hosted) by sender.
    pub user_id: Option<String>,
    /// Restrict to one meeting.
    pub group_id: Option<String>,
    pub method: RetrieveMethod,
    pub memory_types: Option<Vec<String>>,
    /// Upper bound on the total number of returned items.
    pub top_k: usize,
}

impl SearchQuery {
    /// A hybrid query with no filters.
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            user_id: None,
            group_id: None,
            method: RetrieveMethod::Hybrid,
            memory_types: None,
            top_k,
        }
    }

    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// One search hit as returned by a backend.
///
/// Field names follow the hosted service's wire format; every field is
/// defaulted so partial payloads still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Short form of the content (first 200 characters for local records).
    #[serde(default)]
    pub summary: String,
    /// Full content.
    #[serde(default)]
    pub episode: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub memory_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl MemoryItem {
    /// The best available short text: summary, falling back to the episode.
    pub fn display_text(&self) -> &str {
        if self.summary.is_empty() {
            &self.episode
        } else {
            &self.summary
        }
    }
}

/// Items of a single memory type, ordered by descending relevance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryGroup {
    pub memory_type: String,
    pub items: Vec<MemoryItem>,
}

/// Grouped search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub groups: Vec<MemoryGroup>,
}

impl SearchResponse {
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

/// Acknowledgement of a store call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreAck {
    pub status: String,
    pub count: u32,
}

/// Flattened, deduplicated search result for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub meeting_title: String,
    pub meeting_date: Option<DateTime<Utc>>,
    pub participants: Vec<String>,
    pub memory_type: String,
    pub relevance_score: Option<f64>,
}

/// Truncate to the first `SUMMARY_CHARS` characters (not bytes).
pub fn summary_of(content: &str) -> String {
    content.chars().take(SUMMARY_CHARS).collect()
}
