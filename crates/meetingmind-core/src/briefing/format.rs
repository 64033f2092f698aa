//! Context rendering for briefings.

use meetingmind_types::commitment::{Commitment, CommitmentStatus};
use meetingmind_types::memory::SearchResponse;

pub const NO_MEMORIES: &str = "No previous memories found.";
pub const NO_COMMITMENTS: &str = "No pending commitments.";

/// Rendered inputs of one briefing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BriefingContext {
    /// `[type] (timestamp) summary`, in search order.
    pub memory_lines: Vec<String>,
    pub commitment_lines: Vec<String>,
}

impl BriefingContext {
    pub fn new(memories: &SearchResponse, commitments: &[Commitment]) -> Self {
        Self {
            memory_lines: memory_lines(memories),
            commitment_lines: commitments.iter().map(commitment_line).collect(),
        }
    }

    pub fn memories_block(&self) -> String {
        block(&self.memory_lines, NO_MEMORIES)
    }

    pub fn commitments_block(&self) -> String {
        block(&self.commitment_lines, NO_COMMITMENTS)
    }
}

fn block(lines: &[String], empty: &str) -> String {
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

/// One line per item; the type tag is the item's group.
pub fn memory_lines(response: &SearchResponse) -> Vec<String> {
    response
        .groups
        .iter()
        .flat_map(|group| {
            group.items.iter().map(move |item| {
                format!(
                    "[{}] ({}) {}",
                    group.memory_type,
                    item.timestamp,
                    item.display_text()
                )
            })
        })
        .collect()
}

/// `- [You owe] Send deck (Me → Dana) (due: 2026-03-01) [OVERDUE]`
pub fn commitment_line(commitment: &Commitment) -> String {
    let mut line = format!(
        "- [{}] {} ({} → {})",
        commitment.direction.label(),
        commitment.description,
        commitment.owner,
        commitment.recipient
    );
    if let Some(due) = commitment.due_date {
        line.push_str(&format!(" (due: {})", due.format("%Y-%m-%d")));
    }
    if commitment.status == CommitmentStatus::Overdue {
        line.push_str(" [OVERDUE]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use meetingmind_types::commitment::CommitmentDirection;
    use meetingmind_types::memory::{MemoryGroup, MemoryItem};

    use crate::test_support::commitment;

    #[test]
    fn test_empty_context_uses_placeholders() {
        let context = BriefingContext::new(&SearchResponse::default(), &[]);
        assert_eq!(context.memories_block(), NO_MEMORIES);
        assert_eq!(context.commitments_block(), NO_COMMITMENTS);
    }

    #[test]
    fn test_memory_line_prefers_summary() {
        let response = SearchResponse {
            groups: vec![MemoryGroup {
                memory_type: "episodic_memory".to_string(),
                items: vec![
                    MemoryItem {
                        summary: "Short".to_string(),
                        episode: "Short and long".to_string(),
                        timestamp: "2026-02-10T10:00:00+00:00".to_string(),
                        ..Default::default()
                    },
                    MemoryItem {
                        episode: "Episode only".to_string(),
                        ..Default::default()
                    },
                ],
            }],
        };
        assert_eq!(
            memory_lines(&response),
            vec![
                "[episodic_memory] (2026-02-10T10:00:00+00:00) Short".to_string(),
                "[episodic_memory] () Episode only".to_string(),
            ]
        );
    }

    #[test]
    fn test_commitment_line_variants() {
        let mut c = commitment("Send deck", "Me", "Dana");
        assert_eq!(commitment_line(&c), "- [You owe] Send deck (Me → Dana)");

        c.direction = CommitmentDirection::OwedToSelf;
        c.due_date = Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        c.status = CommitmentStatus::Overdue;
        assert_eq!(
            commitment_line(&c),
            "- [Owed to you] Send deck (Me → Dana) (due: 2026-03-01) [OVERDUE]"
        );
    }
}
