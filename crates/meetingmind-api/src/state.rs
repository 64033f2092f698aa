//! Application state wiring all services together.
//!
//! Services are generic over repository traits; `AppState` pins them to the
//! in-memory infra implementations and picks the memory backend and model
//! provider once, from configuration.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use meetingmind_core::briefing::orchestrator::BriefingOrchestrator;
use meetingmind_core::commitment::manager::CommitmentManager;
use meetingmind_core::contact::ContactDirectory;
use meetingmind_core::llm::ModelSelection;
use meetingmind_core::meeting::coordinator::MeetingCoordinator;
use meetingmind_core::meeting::queue::spawn_worker;
use meetingmind_core::meeting::service::MeetingService;
use meetingmind_core::search::SearchService;
use meetingmind_infra::llm::create_provider;
use meetingmind_infra::memory::create_memory_store;
use meetingmind_infra::store::{InMemoryCommitmentRepository, InMemoryMeetingRepository};
use meetingmind_types::config::AppConfig;

pub type ConcreteMeetingService = MeetingService<InMemoryMeetingRepository>;
pub type ConcreteCommitmentManager = CommitmentManager<InMemoryCommitmentRepository>;
pub type ConcreteBriefingOrchestrator = BriefingOrchestrator<InMemoryCommitmentRepository>;
pub type ConcreteContactDirectory =
    ContactDirectory<InMemoryMeetingRepository, InMemoryCommitmentRepository>;

/// Shared state handed to every REST handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub meetings: Arc<ConcreteMeetingService>,
    pub commitments: Arc<ConcreteCommitmentManager>,
    pub search: Arc<SearchService>,
    pub briefings: Arc<ConcreteBriefingOrchestrator>,
    pub contacts: Arc<ConcreteContactDirectory>,
    pub memory_backend: String,
    pub llm_configured: bool,
}

impl AppState {
    /// Wire stores, backends and services, and start the processing worker.
    ///
    /// The worker stops when `cancel` fires; the returned handle completes
    /// once in-flight meetings have drained.
    pub fn init(
        config: AppConfig,
        cancel: CancellationToken,
    ) -> anyhow::Result<(Self, JoinHandle<()>)> {
        let memory = Arc::new(create_memory_store(&config.memory)?);
        let memory_backend = memory.backend().to_string();

        let provider = create_provider(&config.llm)?.map(Arc::new);
        let llm_configured = provider.is_some();
        let (analysis, stream) = match provider {
            Some(provider) => {
                info!(
                    provider = provider.name(),
                    analysis_model = %config.llm.analysis_model,
                    stream_model = %config.llm.stream_model,
                    "model provider configured"
                );
                (
                    ModelSelection::new(Some(Arc::clone(&provider)), &config.llm.analysis_model),
                    ModelSelection::new(Some(provider), &config.llm.stream_model),
                )
            }
            None => {
                warn!("no model credentials configured; using offline fallbacks");
                (ModelSelection::offline(), ModelSelection::offline())
            }
        };

        let meeting_repo = Arc::new(InMemoryMeetingRepository::new());
        let commitments = Arc::new(CommitmentManager::new(InMemoryCommitmentRepository::new()));

        let coordinator = Arc::new(MeetingCoordinator::new(
            Arc::clone(&meeting_repo),
            Arc::clone(&commitments),
            Arc::clone(&memory),
            analysis,
        ));
        let (queue, worker) = spawn_worker(coordinator, &config.processing, cancel);

        let meetings = MeetingService::new(
            Arc::clone(&meeting_repo),
            queue,
            config.limits.clone(),
        );
        let search = SearchService::new(Arc::clone(&memory), config.limits.clone());
        let briefings = BriefingOrchestrator::new(
            Arc::clone(&memory),
            Arc::clone(&commitments),
            stream,
            config.briefing.clone(),
        );
        let contacts = ContactDirectory::new(meeting_repo, Arc::clone(&commitments));

        info!(memory_backend = %memory_backend, llm_configured, "application state ready");

        let state = Self {
            config: Arc::new(config),
            meetings: Arc::new(meetings),
            commitments,
            search: Arc::new(search),
            briefings: Arc::new(briefings),
            contacts: Arc::new(contacts),
            memory_backend,
            llm_configured,
        };
        Ok((state, worker))
    }
}
