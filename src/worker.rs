//! Off-thread task dispatch with superseding action slots.
//!
//! Every user-triggered retrieval runs as an independent tokio task. Each
//! logical action slot (e.g. "author search", "paper fetch for selected
//! author") tracks at most one current task: starting a new one bumps the
//! slot's generation and supersedes the old task, which keeps running (no
//! cancellation primitive) but whose terminal event is discarded on
//! arrival. This closes the stale-result window where a slow superseded
//! retrieval could overwrite a newer one's results.
//!
//! A task emits exactly one terminal event: success with payload, or a
//! failure message. Tasks share no mutable state; each constructs its own
//! data and hands it off once.

use std::future::Future;
use tokio::sync::mpsc;
use tracing::debug;

/// Terminal event of one dispatched task.
#[derive(Debug)]
pub struct TaskEvent<T> {
    /// Generation of the dispatch that produced this event
    pub generation: u64,
    /// Success payload or human-readable failure message
    pub outcome: Result<T, String>,
}

/// One logical action slot with a monotonically increasing generation.
pub struct ActionSlot<T> {
    generation: u64,
    tx: mpsc::UnboundedSender<TaskEvent<T>>,
    rx: mpsc::UnboundedReceiver<TaskEvent<T>>,
}

impl<T: Send + 'static> ActionSlot<T> {
    /// Create an idle slot.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 0,
            tx,
            rx,
        }
    }

    /// Dispatch a task and return its generation immediately.
    ///
    /// The previous task, if any, is superseded but not cancelled; its
    /// terminal event will be discarded by [`ActionSlot::recv`].
    pub fn start<F, E>(&mut self, task: F) -> u64
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = task.await.map_err(|e| e.to_string());
            // Receiver may be gone; a task delivers at most once either way
            let _ = tx.send(TaskEvent {
                generation,
                outcome,
            });
        });

        generation
    }

    /// Await the terminal event of the latest dispatched task.
    ///
    /// Events from superseded generations are discarded silently.
    pub async fn recv(&mut self) -> TaskEvent<T> {
        loop {
            // The slot holds a sender, so the channel cannot close
            if let Some(event) = self.rx.recv().await {
                if event.generation == self.generation {
                    return event;
                }
                debug!(
                    stale = event.generation,
                    current = self.generation,
                    "Discarding stale task event"
                );
            }
        }
    }

    /// Generation of the latest dispatched task.
    pub fn current_generation(&self) -> u64 {
        self.generation
    }
}

impl<T: Send + 'static> Default for ActionSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
