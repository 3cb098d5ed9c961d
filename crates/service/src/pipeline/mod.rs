//! Background thumbnail derivation pipeline.
//!
//! Uploads enqueue a lightweight job over a flume channel; dedicated worker
//! tasks consume jobs off the request path and write size variants next to
//! the base blob. Variant generation is idempotent and path-deterministic,
//! so at-least-once delivery (including concurrent duplicate processing) is
//! safe.

mod thumbnails;

pub use thumbnails::{process_job, JobError, THUMBNAIL_WIDTHS};

use anyhow::Result;
use tokio::sync::watch;
use uuid::Uuid;

use crate::ServiceState;

/// Maximum deliveries for a job that keeps failing transiently.
const MAX_DELIVERIES: u32 = 3;

/// A pending "derive variants for this file" message.
#[derive(Debug, Clone)]
pub struct Job {
    pub owner_id: Uuid,
    pub file_id: Uuid,
    /// Delivery counter, starts at 0 and increments per redelivery.
    pub attempt: u32,
}

impl Job {
    fn next_delivery(mut self) -> Self {
        self.attempt += 1;
        self
    }
}

/// Cloneable handle for enqueueing jobs from anywhere in the service.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tx: flume::Sender<Job>,
}

impl JobDispatcher {
    /// Create a dispatcher/receiver pair. The receiver side goes to the
    /// worker tasks; it can be cloned for multiple consumers.
    pub fn new() -> (Self, JobReceiver) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, JobReceiver { rx })
    }

    /// Enqueue a derivation job. Non-blocking, fire-and-forget from the
    /// upload path's perspective.
    pub fn dispatch(&self, owner_id: Uuid, file_id: Uuid) -> Result<()> {
        self.send(Job {
            owner_id,
            file_id,
            attempt: 0,
        })
    }

    fn send(&self, job: Job) -> Result<()> {
        tracing::debug!(file_id = %job.file_id, attempt = job.attempt, "dispatching job");
        self.tx
            .send(job)
            .map_err(|_| anyhow::anyhow!("job receiver has been dropped"))
    }
}

/// Receiving side of the job queue, consumed by worker tasks.
#[derive(Debug, Clone)]
pub struct JobReceiver {
    rx: flume::Receiver<Job>,
}

/// Spawn `count` pipeline workers consuming from a shared queue.
pub fn spawn_workers(
    count: usize,
    state: ServiceState,
    receiver: JobReceiver,
    shutdown_rx: watch::Receiver<()>,
) -> Vec<tokio::task::JoinHandle<()>> {
    (0..count)
        .map(|worker| {
            let state = state.clone();
            let rx = receiver.clone();
            let shutdown = shutdown_rx.clone();
            tokio::spawn(run_worker(worker, state, rx, shutdown))
        })
        .collect()
}

async fn run_worker(
    worker: usize,
    state: ServiceState,
    receiver: JobReceiver,
    mut shutdown_rx: watch::Receiver<()>,
) {
    tracing::info!(worker, "pipeline worker started");
    loop {
        let job = tokio::select! {
            _ = shutdown_rx.changed() => break,
            job = receiver.rx.recv_async() => match job {
                Ok(job) => job,
                // All dispatchers dropped.
                Err(_) => break,
            },
        };

        handle_job(worker, &state, job).await;
    }
    tracing::info!(worker, "pipeline worker stopped");
}

async fn handle_job(worker: usize, state: &ServiceState, job: Job) {
    let file_id = job.file_id;
    match process_job(state.database(), state.blobs(), &job).await {
        Ok(()) => {
            tracing::debug!(worker, %file_id, "derived variants");
        }
        Err(JobError::Permanent(reason)) => {
            // Data precondition that will never become true; drop the job.
            tracing::warn!(worker, %file_id, %reason, "dropping job");
        }
        Err(JobError::Transient(e)) => {
            if job.attempt + 1 < MAX_DELIVERIES {
                tracing::warn!(worker, %file_id, error = %e, "job failed, redelivering");
                if let Err(e) = state.jobs().send(job.next_delivery()) {
                    tracing::error!(worker, %file_id, error = %e, "redelivery failed");
                }
            } else {
                tracing::error!(worker, %file_id, error = %e, "job exhausted deliveries");
            }
        }
    }
}
