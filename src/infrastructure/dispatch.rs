//! Serialized callback delivery.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::ports::{DeliveryContext, DeliveryJob};

/// Delivery context backed by a FIFO channel.
///
/// Jobs run one after another on whoever drains the paired
/// [`DeliveryQueue`]: the caller's own event loop, or a single task
/// started with [`SerialDispatcher::spawn`].
#[derive(Debug, Clone)]
pub struct SerialDispatcher {
    job_tx: mpsc::UnboundedSender<DeliveryJob>,
}

impl SerialDispatcher {
    /// Creates a dispatcher and the queue that must be drained to run jobs.
    #[must_use]
    pub fn new() -> (Self, DeliveryQueue) {
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        (Self { job_tx }, DeliveryQueue { job_rx })
    }

    /// Creates a dispatcher drained by a dedicated tokio task.
    #[must_use]
    pub fn spawn() -> Self {
        let (dispatcher, queue) = Self::new();
        tokio::spawn(queue.run());
        dispatcher
    }
}

impl DeliveryContext for SerialDispatcher {
    fn dispatch(&self, job: DeliveryJob) {
        if self.job_tx.send(job).is_err() {
            warn!("Delivery queue closed, dropping callback");
        }
    }
}

/// Receiving end of a [`SerialDispatcher`].
pub struct DeliveryQueue {
    job_rx: mpsc::UnboundedReceiver<DeliveryJob>,
}

impl DeliveryQueue {
    /// Waits for the next job. `None` once every dispatcher is dropped.
    pub async fn next_job(&mut self) -> Option<DeliveryJob> {
        self.job_rx.recv().await
    }

    /// Runs every job already queued, without waiting. Returns the count.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.job_rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Runs jobs until all dispatchers are dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.job_rx.recv().await {
            job();
        }
        debug!("Delivery queue drained");
    }
}

impl std::fmt::Debug for DeliveryQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryQueue").finish_non_exhaustive()
    }
}
