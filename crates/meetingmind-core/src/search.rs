//! Memory search for display.

use std::sync::Arc;

use meetingmind_types::config::LimitsConfig;
use meetingmind_types::error::SearchError;
use meetingmind_types::memory::{MemoryItem, SearchQuery, SearchResult, DEFAULT_MEMORY_TYPE};

use crate::memory::results::shape_results;
use crate::memory::store::BoxMemoryStore;

/// Result cap for user searches.
pub const SEARCH_TOP_K: usize = 15;

/// Default cap for the recent-memory listing.
pub const RECENT_LIMIT: usize = 40;

pub struct SearchService {
    memory: Arc<BoxMemoryStore>,
    limits: LimitsConfig,
}

impl SearchService {
    pub fn new(memory: Arc<BoxMemoryStore>, limits: LimitsConfig) -> Self {
        Self { memory, limits }
    }

    /// Reject a contact name over the configured name limit. Blank names
    /// normalize to `None`.
    pub fn normalize_contact<'a>(
        &self,
        contact: Option<&'a str>,
    ) -> Result<Option<&'a str>, SearchError> {
        let Some(contact) = contact.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        if contact.chars().count() > self.limits.max_name_chars {
            return Err(SearchError::Validation(format!(
                "contact exceeds {} characters",
                self.limits.max_name_chars
            )));
        }
        Ok(Some(contact))
    }

    /// Hybrid search for `query`, boosted toward `contact`, shaped and
    /// deduplicated. A query with no matches yields an empty list.
    #[tracing::instrument(name = "search_memories", skip(self, query), fields(query_chars = query.len()))]
    pub async fn search(
        &self,
        query: &str,
        contact: Option<&str>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.chars().count() > self.limits.max_query_chars {
            return Err(SearchError::Validation(format!(
                "query exceeds {} characters",
                self.limits.max_query_chars
            )));
        }
        let contact = self.normalize_contact(contact)?;

        let request =
            SearchQuery::new(query, SEARCH_TOP_K).with_user(contact.map(str::to_string));
        let response = self.memory.search(&request).await?;
        Ok(shape_results(&response))
    }

    /// Newest stored memories, optionally for one contact.
    pub async fn recent(
        &self,
        contact: Option<&str>,
        memory_type: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryItem>, SearchError> {
        let contact = self.normalize_contact(contact)?;
        let items = self
            .memory
            .list_recent(
                contact,
                memory_type.unwrap_or(DEFAULT_MEMORY_TYPE),
                limit.unwrap_or(RECENT_LIMIT),
            )
            .await?;
        Ok(items)
    }
}
