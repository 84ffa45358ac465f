use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use timetable_core::mutation::{MutationPhase, MutationStatus};

/// Status of the most recent call of one mutation kind.
///
/// Overlapping calls are allowed; only the latest one publishes.
#[derive(Debug, Clone)]
pub struct MutationTracker {
    tx: Arc<watch::Sender<MutationPhase>>,
    latest: Arc<AtomicU64>,
}

impl Default for MutationTracker {
    fn default() -> Self {
        let (tx, _) = watch::channel(MutationPhase::Idle);
        Self {
            tx: Arc::new(tx),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl MutationTracker {
    pub fn phase(&self) -> MutationPhase {
        *self.tx.borrow()
    }

    pub fn status(&self) -> MutationStatus {
        self.phase().status()
    }

    pub fn is_pending(&self) -> bool {
        self.status().is_pending()
    }

    pub fn is_error(&self) -> bool {
        self.status().is_error()
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationPhase> {
        self.tx.subscribe()
    }

    /// Starts a new attempt in `Idle`.
    pub(crate) fn begin(&self) -> Attempt {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Attempt {
            tracker: self.clone(),
            id,
            phase: MutationPhase::Idle,
        }
    }

    fn publish(&self, id: u64, phase: MutationPhase) {
        self.tx.send_if_modified(|current| {
            if self.latest.load(Ordering::SeqCst) != id {
                return false;
            }
            *current = phase;
            true
        });
    }
}

/// One run through the mutation state machine.
#[derive(Debug)]
pub(crate) struct Attempt {
    tracker: MutationTracker,
    id: u64,
    phase: MutationPhase,
}

impl Attempt {
    #[cfg(test)]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn advance(&mut self, next: MutationPhase) {
        match self.phase.advance(next) {
            Ok(phase) => {
                self.phase = phase;
                self.tracker.publish(self.id, phase);
            }
            Err(err) => {
                tracing::error!(attempt = self.id, error = %err, "Mutation state machine violated")
            }
        }
    }
}
