//! Processing queue between intake and the coordinator.
//!
//! Intake submits meeting ids into a bounded mpsc channel. A single worker
//! task drains it and runs each job in its own task, with at most
//! `max_concurrent` jobs in flight. Cancelling the token stops intake of new
//! jobs; jobs already running finish before the worker exits, and meetings
//! still waiting in the queue are marked `failed`.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use meetingmind_types::config::ProcessingConfig;
use meetingmind_types::error::MeetingError;

use crate::commitment::repository::CommitmentRepository;

use super::coordinator::MeetingCoordinator;
use super::repository::MeetingRepository;

/// Submission handle for the processing worker. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ProcessingQueue {
    sender: mpsc::Sender<Uuid>,
}

impl ProcessingQueue {
    #[cfg(test)]
    pub(crate) fn from_sender(sender: mpsc::Sender<Uuid>) -> Self {
        Self { sender }
    }

    /// Enqueue one meeting. Waits while the queue is full.
    pub async fn submit(&self, meeting_id: Uuid) -> Result<(), MeetingError> {
        self.sender
            .send(meeting_id)
            .await
            .map_err(|_| MeetingError::QueueClosed)
    }
}

/// Start the worker. Returns the submission handle and the worker task,
/// which completes after `cancel` fires and in-flight jobs drain.
pub fn spawn_worker<M, C>(
    coordinator: Arc<MeetingCoordinator<M, C>>,
    config: &ProcessingConfig,
    cancel: CancellationToken,
) -> (ProcessingQueue, JoinHandle<()>)
where
    M: MeetingRepository + 'static,
    C: CommitmentRepository + 'static,
{
    let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
    let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
    let handle = tokio::spawn(run_worker(coordinator, receiver, permits, cancel));
    (ProcessingQueue { sender }, handle)
}

async fn run_worker<M, C>(
    coordinator: Arc<MeetingCoordinator<M, C>>,
    mut receiver: mpsc::Receiver<Uuid>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
) where
    M: MeetingRepository + 'static,
    C: CommitmentRepository + 'static,
{
    let mut in_flight = JoinSet::new();
    let mut stranded = Vec::new();
    info!("meeting processing worker started");

    loop {
        // Reap finished jobs so the set does not grow without bound.
        while in_flight.try_join_next().is_some() {}

        let meeting_id = tokio::select! {
            _ = cancel.cancelled() => break,
            job = receiver.recv() => match job {
                Some(id) => id,
                None => break,
            },
        };

        let permit = tokio::select! {
            _ = cancel.cancelled() => {
                stranded.push(meeting_id);
                break;
            }
            permit = Arc::clone(&permits).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        debug!(meeting_id = %meeting_id, "dispatching meeting job");
        let coordinator = Arc::clone(&coordinator);
        in_flight.spawn(async move {
            coordinator.process(meeting_id).await;
            drop(permit);
        });
    }

    receiver.close();
    while let Ok(meeting_id) = receiver.try_recv() {
        stranded.push(meeting_id);
    }
    for meeting_id in &stranded {
        coordinator.abandon(*meeting_id).await;
    }

    let draining = in_flight.len();
    while in_flight.join_next().await.is_some() {}
    info!(
        drained = draining,
        abandoned = stranded.len(),
        "meeting processing worker stopped"
    );
}
