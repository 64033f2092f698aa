//! Short transcript summaries stored on the meeting.

use meetingmind_types::llm::{CompletionRequest, LlmError};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::log_completion;

const SUMMARY_PROMPT: &str = r#"Summarize the following meeting transcript in 2-3 sentences. Focus on decisions made, key topics and agreed next steps. Use participant names where relevant.

<meeting>
{transcript}
</meeting>"#;

/// Character cap for the offline summary.
const OFFLINE_SUMMARY_CHARS: usize = 280;

/// Stateless utility for summarizing meeting transcripts.
pub struct MeetingSummarizer;

impl MeetingSummarizer {
    /// Summarize `transcript` with the analysis model, or offline when no
    /// provider is configured.
    #[tracing::instrument(
        name = "summarize_meeting",
        skip(provider, transcript),
        fields(offline = provider.is_none(), transcript_chars = transcript.len())
    )]
    pub async fn summarize(
        provider: Option<&BoxLlmProvider>,
        model: &str,
        transcript: &str,
    ) -> Result<String, LlmError> {
        let Some(provider) = provider else {
            return Ok(Self::offline_summary(transcript));
        };
        if transcript.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = SUMMARY_PROMPT.replace("{transcript}", transcript);
        let request = CompletionRequest::new(model, prompt, 300).with_temperature(0.3);

        let response = provider.complete(&request).await?;
        log_completion("summary", &response);
        Ok(response.content.trim().to_string())
    }

    /// First two sentences of the transcript, capped at 280 characters.
    pub fn offline_summary(transcript: &str) -> String {
        let text = transcript.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut end = text.len();
        let mut sentences = 0;
        for (i, c) in text.char_indices() {
            if matches!(c, '.' | '!' | '?') {
                let next = text[i + c.len_utf8()..].chars().next();
                if next.is_none_or(char::is_whitespace) {
                    sentences += 1;
                    if sentences == 2 {
                        end = i + c.len_utf8();
                        break;
                    }
                }
            }
        }

        let summary = &text[..end];
        if summary.chars().count() <= OFFLINE_SUMMARY_CHARS {
            return summary.to_string();
        }
        let mut capped: String = summary.chars().take(OFFLINE_SUMMARY_CHARS - 3).collect();
        capped.truncate(capped.trim_end().len());
        capped.push_str("...");
        capped
    }
}
