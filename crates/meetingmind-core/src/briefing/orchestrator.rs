//! Briefing generation.
//!
//! [`BriefingOrchestrator::generate`] spawns a producer task that gathers
//! context, then streams either model output or the offline narrative into a
//! bounded channel. The returned [`BriefingStream`] owns the producer's
//! cancellation guard: dropping it (a client disconnect) stops the producer
//! and with it the upstream model connection.
//!
//! Every stream ends with exactly one terminal event: `Done` on success,
//! `Error` on failure.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use meetingmind_types::briefing::BriefingEvent;
use meetingmind_types::config::BriefingConfig;
use meetingmind_types::error::{CommitmentError, MemoryStoreError};
use meetingmind_types::llm::{CompletionRequest, LlmError, StopReason, StreamEvent};
use meetingmind_types::memory::SearchQuery;

use crate::commitment::manager::CommitmentManager;
use crate::commitment::repository::CommitmentRepository;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::ModelSelection;
use crate::memory::store::BoxMemoryStore;

use super::format::BriefingContext;

pub const BRIEFING_PROMPT: &str = r#"You are a meeting preparation assistant. Generate a concise pre-meeting briefing based on the following memories about {contact_name}.

Structure the briefing in 4 sections:
1. **Last Meeting Summary** - What was discussed most recently
2. **Open Commitments** - Pending promises (both directions: what I owe them, what they owe me)
3. **Relationship Profile** - Communication style, key interests, preferences
4. **Related Context** - Relevant information from other meetings or participants

Keep each section to 2-4 sentences. Be specific and actionable.

Memories:
{memories}

Commitments:
{commitments}"#;

/// Memories retrieved per briefing.
pub const BRIEFING_TOP_K: usize = 15;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum BriefingError {
    #[error("memory retrieval failed: {0}")]
    Memory(#[from] MemoryStoreError),

    #[error("commitment lookup failed: {0}")]
    Commitment(#[from] CommitmentError),

    #[error("briefing generation failed: {0}")]
    Llm(#[from] LlmError),

    /// The consumer went away; nothing more can be delivered.
    #[error("briefing consumer disconnected")]
    Disconnected,
}

/// Stream of briefing events. Dropping it cancels generation.
pub struct BriefingStream {
    inner: ReceiverStream<BriefingEvent>,
    _guard: DropGuard,
}

impl Stream for BriefingStream {
    type Item = BriefingEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

pub struct BriefingOrchestrator<C: CommitmentRepository> {
    memory: Arc<BoxMemoryStore>,
    commitments: Arc<CommitmentManager<C>>,
    model: ModelSelection,
    pacing: BriefingConfig,
}

impl<C: CommitmentRepository + 'static> BriefingOrchestrator<C> {
    pub fn new(
        memory: Arc<BoxMemoryStore>,
        commitments: Arc<CommitmentManager<C>>,
        model: ModelSelection,
        pacing: BriefingConfig,
    ) -> Self {
        Self {
            memory,
            commitments,
            model,
            pacing,
        }
    }

    /// Memories about `contact` plus their pending and overdue commitments.
    pub async fn build_context(&self, contact: &str) -> Result<BriefingContext, BriefingError> {
        let query = SearchQuery::new(
            format!("{contact} discussions commitments decisions"),
            BRIEFING_TOP_K,
        );
        let memories = self.memory.search(&query).await?;
        let open = self.commitments.open_for_contact(contact).await?;
        debug!(
            memories = memories.total_count(),
            commitments = open.len(),
            "briefing context gathered"
        );
        Ok(BriefingContext::new(&memories, &open))
    }

    /// Start generating a briefing for `contact`.
    pub fn generate(self: &Arc<Self>, contact: impl Into<String>) -> BriefingStream {
        let contact = contact.into();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let this = Arc::clone(self);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(contact = %contact, "briefing cancelled by consumer");
                }
                _ = this.produce(&contact, &tx) => {}
            }
        });

        BriefingStream {
            inner: ReceiverStream::new(rx),
            _guard: cancel.drop_guard(),
        }
    }

    async fn produce(&self, contact: &str, tx: &mpsc::Sender<BriefingEvent>) {
        let terminal = match self.run(contact, tx).await {
            Ok(()) => {
                info!(contact = %contact, "briefing delivered");
                BriefingEvent::Done
            }
            Err(BriefingError::Disconnected) => return,
            Err(e) => {
                warn!(contact = %contact, error = %e, "briefing failed");
                BriefingEvent::Error {
                    message: e.to_string(),
                }
            }
        };
        let _ = tx.send(terminal).await;
    }

    async fn run(
        &self,
        contact: &str,
        tx: &mpsc::Sender<BriefingEvent>,
    ) -> Result<(), BriefingError> {
        let context = self.build_context(contact).await?;
        match self.model.provider() {
            Some(provider) => {
                let prompt = render_prompt(contact, &context);
                stream_model(provider, &self.model.model, prompt, tx).await
            }
            None => {
                let sections = offline_sections(contact, &context);
                stream_offline(&sections, &self.pacing, tx).await
            }
        }
    }
}

pub fn render_prompt(contact: &str, context: &BriefingContext) -> String {
    BRIEFING_PROMPT
        .replace("{contact_name}", contact)
        .replace("{memories}", &context.memories_block())
        .replace("{commitments}", &context.commitments_block())
}

async fn emit(tx: &mpsc::Sender<BriefingEvent>, event: BriefingEvent) -> Result<(), BriefingError> {
    tx.send(event).await.map_err(|_| BriefingError::Disconnected)
}

async fn stream_model(
    provider: &BoxLlmProvider,
    model: &str,
    prompt: String,
    tx: &mpsc::Sender<BriefingEvent>,
) -> Result<(), BriefingError> {
    let request = CompletionRequest::new(model, prompt, 800).with_temperature(0.4);

    let mut events = provider.stream(request);
    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::TextDelta { text } if !text.is_empty() => {
                emit(tx, BriefingEvent::token(text)).await?;
            }
            StreamEvent::TextDelta { .. } => {}
            StreamEvent::MessageDelta { stop_reason } => {
                if stop_reason == StopReason::MaxTokens {
                    warn!("briefing truncated at max_tokens");
                }
            }
            StreamEvent::Usage(usage) => {
                debug!(
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "briefing stream usage"
                );
            }
            StreamEvent::Done => break,
        }
    }
    Ok(())
}

/// The deterministic four-section narrative used without a model.
pub fn offline_sections(contact: &str, context: &BriefingContext) -> Vec<String> {
    let last_meeting = context
        .memory_lines
        .first()
        .cloned()
        .unwrap_or_else(|| format!("No previous meetings with {contact} are on record."));

    let commitments = context.commitments_block();
    let open = context.commitment_lines.len();
    let memories = context.memory_lines.len();
    let profile = format!(
        "{contact} appears in {memories} remembered discussion{} and has {open} open commitment{} with you.",
        plural(memories),
        plural(open)
    );

    let related = if context.memory_lines.len() > 1 {
        context.memory_lines[1..].join("\n")
    } else {
        format!("No related context from other meetings involving {contact}.")
    };

    vec![
        format!("## Last Meeting Summary\n\n{last_meeting}\n\n"),
        format!("## Open Commitments\n\n{commitments}\n\n"),
        format!("## Relationship Profile\n\n{profile}\n\n"),
        format!("## Related Context\n\n{related}\n"),
    ]
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

async fn stream_offline(
    sections: &[String],
    pacing: &BriefingConfig,
    tx: &mpsc::Sender<BriefingEvent>,
) -> Result<(), BriefingError> {
    let char_delay = Duration::from_millis(pacing.char_delay_ms);
    let section_delay = Duration::from_millis(pacing.section_delay_ms);

    for section in sections {
        for ch in section.chars() {
            emit(tx, BriefingEvent::token(ch.to_string())).await?;
            if !char_delay.is_zero() {
                tokio::time::sleep(char_delay).await;
            }
        }
        if !section_delay.is_zero() {
            tokio::time::sleep(section_delay).await;
        }
    }
    Ok(())
}
