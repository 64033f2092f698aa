//! In-process lexical memory index.
//!
//! Records live in an append-only `Vec` behind an async `RwLock`; a record is
//! pushed under the write lock in one step, so searches never observe a
//! partially written record.

use tokio::sync::RwLock;

use meetingmind_types::error::MemoryStoreError;
use meetingmind_types::memory::{
    summary_of, MemoryGroup, MemoryItem, MemoryRecord, SearchQuery, SearchResponse, StoreAck,
};

use super::store::MemoryStore;

#[derive(Debug, Default)]
pub struct LocalMemoryIndex {
    records: RwLock<Vec<MemoryRecord>>,
}

impl LocalMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Lexical relevance of `record` for the lowercased query `tokens`.
///
/// +2 per token in the content, +1 per token in the meeting name, +1 per
/// token in the sender display name, +1 when `user_id` appears in the sender
/// display name. All matches are case-insensitive substring matches.
pub fn score_record(record: &MemoryRecord, tokens: &[String], user_id: Option<&str>) -> u32 {
    let content = record.content.to_lowercase();
    let group = record.group_name.to_lowercase();
    let sender = record.sender_name.to_lowercase();

    let mut score = 0;
    for token in tokens {
        if content.contains(token.as_str()) {
            score += 2;
        }
        if group.contains(token.as_str()) {
            score += 1;
        }
        if sender.contains(token.as_str()) {
            score += 1;
        }
    }
    if let Some(user) = user_id {
        if sender.contains(&user.to_lowercase()) {
            score += 1;
        }
    }
    score
}

fn to_item(record: &MemoryRecord, score: Option<f64>) -> MemoryItem {
    MemoryItem {
        summary: summary_of(&record.content),
        episode: record.content.clone(),
        timestamp: record.timestamp.clone(),
        group_name: record.group_name.clone(),
        participants: vec![record.sender_name.clone()],
        memory_type: record.memory_type.clone(),
        score,
    }
}

impl MemoryStore for LocalMemoryIndex {
    fn backend(&self) -> &str {
        "local"
    }

    async fn store(&self, record: &MemoryRecord) -> Result<StoreAck, MemoryStoreError> {
        self.records.write().await.push(record.clone());
        tracing::debug!(message_id = %record.message_id, "stored local memory record");
        Ok(StoreAck {
            status: "ok".to_string(),
            count: 1,
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, MemoryStoreError> {
        let tokens: Vec<String> = query
            .query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let records = self.records.read().await;
        let mut matches: Vec<(u32, &MemoryRecord)> = records
            .iter()
            .filter(|r| query.group_id.as_ref().is_none_or(|g| &r.group_id == g))
            .filter(|r| {
                query
                    .memory_types
                    .as_ref()
                    .is_none_or(|types| types.iter().any(|t| t == &r.memory_type))
            })
            .map(|r| (score_record(r, &tokens, query.user_id.as_deref()), r))
            .filter(|(score, _)| *score > 0)
            .collect();

        // `sort_by` is stable, so equal scores keep storage order.
        matches.sort_by(|a, b| b.0.cmp(&a.0));
        matches.truncate(query.top_k);

        let mut groups: Vec<MemoryGroup> = Vec::new();
        for (score, record) in matches {
            let item = to_item(record, Some(f64::from(score)));
            match groups.iter_mut().find(|g| g.memory_type == record.memory_type) {
                Some(group) => group.items.push(item),
                None => groups.push(MemoryGroup {
                    memory_type: record.memory_type.clone(),
                    items: vec![item],
                }),
            }
        }

        Ok(SearchResponse { groups })
    }

    async fn list_recent(
        &self,
        user_id: Option<&str>,
        memory_type: &str,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryStoreError> {
        let user = user_id.map(str::to_lowercase);
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.memory_type == memory_type)
            .filter(|r| {
                user.as_ref().is_none_or(|u| {
                    r.sender_id == *u || r.sender_name.to_lowercase().contains(u.as_str())
                })
            })
            .take(limit)
            .map(|r| to_item(r, None))
            .collect())
    }
}
