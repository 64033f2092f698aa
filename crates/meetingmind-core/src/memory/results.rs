//! Flattening and dedup of grouped search responses.
//!
//! The same transcript is stored once per participant, so a raw search often
//! returns near-identical items that differ only by sender. Shaping collapses
//! them on `(first 200 chars of content, meeting title)` and merges the
//! senders into one participant list.

use std::collections::HashMap;

use meetingmind_types::memory::{summary_of, SearchResponse, SearchResult};

use crate::time::parse_iso8601;

pub const UNKNOWN_MEETING: &str = "Unknown meeting";

/// Flatten `response` into display results in group/item order, dropping
/// duplicates. Deterministic for a given response.
pub fn shape_results(response: &SearchResponse) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = Vec::new();
    let mut seen: HashMap<(String, String), usize> = HashMap::new();

    for group in &response.groups {
        for item in &group.items {
            let content = item.display_text().to_string();
            let meeting_title = if item.group_name.is_empty() {
                UNKNOWN_MEETING.to_string()
            } else {
                item.group_name.clone()
            };
            let key = (summary_of(&content), meeting_title.clone());

            if let Some(&index) = seen.get(&key) {
                let existing = &mut results[index];
                for name in &item.participants {
                    if !existing.participants.contains(name) {
                        existing.participants.push(name.clone());
                    }
                }
                continue;
            }

            let memory_type = if item.memory_type.is_empty() {
                group.memory_type.clone()
            } else {
                item.memory_type.clone()
            };
            seen.insert(key, results.len());
            results.push(SearchResult {
                content,
                meeting_title,
                meeting_date: parse_iso8601(&item.timestamp),
                participants: item.participants.clone(),
                memory_type,
                relevance_score: item.score,
            });
        }
    }

    results
}
