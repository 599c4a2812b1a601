//! Boot Driver
//!
//! Runs a [`BootSequence`] on its own tokio task so surfaces only ever see
//! snapshots. The task waits for the sequence's next timer deadline, advances
//! it, and publishes a snapshot over a `watch` channel whenever state changed.
//!
//! # Lifecycle
//!
//! - [`BootDriver::mount`] spawns the task (must be called inside a runtime).
//! - [`BootDriver::unmount`] stops the task, tears the sequence down and
//!   returns the last snapshot. Nothing is published afterwards.
//! - Dropping a driver without unmounting aborts the task.

use std::future;

use rand::Rng;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::BootConfig;
use crate::events::BootSnapshot;
use crate::sequence::BootSequence;

/// Handle to a mounted boot sequence
#[derive(Debug)]
pub struct BootDriver {
    snapshots: watch::Receiver<BootSnapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<BootSnapshot>>,
}

impl BootDriver {
    /// Mount a fresh sequence and start its timers
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn mount<R>(config: BootConfig, rng: R) -> Self
    where
        R: Rng + Send + 'static,
    {
        let sequence = BootSequence::mount(config, rng);
        let (tx, rx) = watch::channel(sequence.snapshot());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run_sequence(sequence, tx, shutdown_rx));
        tracing::info!("Boot driver mounted");

        Self {
            snapshots: rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// A receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<BootSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> BootSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop the sequence and cancel all of its timers
    pub async fn unmount(mut self) -> BootSnapshot {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        let last = match self.task.take() {
            Some(task) => match task.await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(error = %e, "Boot driver task ended abnormally");
                    let mut snapshot = self.snapshot();
                    snapshot.torn_down = true;
                    snapshot
                }
            },
            None => self.snapshot(),
        };

        tracing::info!(phase = last.phase.label(), "Boot driver unmounted");
        last
    }
}

impl Drop for BootDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_sequence<R: Rng>(
    mut sequence: BootSequence<R>,
    tx: watch::Sender<BootSnapshot>,
    mut shutdown: oneshot::Receiver<()>,
) -> BootSnapshot {
    // Virtual time is anchored here so deadlines never drift from wall time.
    let mounted_at = Instant::now();

    loop {
        // A deadline past what Instant can represent never arrives.
        let wake = sequence
            .time_to_next_timer()
            .and_then(|wait| mounted_at.checked_add(sequence.elapsed().saturating_add(wait)));

        tokio::select! {
            biased;

            _ = &mut shutdown => break,

            _ = wait_until(wake) => {
                let behind = mounted_at.elapsed().saturating_sub(sequence.elapsed());
                let events = sequence.advance(behind);
                if !events.is_empty() {
                    tracing::trace!(count = events.len(), "Publishing boot snapshot");
                    tx.send_replace(sequence.snapshot());
                }
            }
        }
    }

    sequence.teardown();
    sequence.snapshot()
}

async fn wait_until(wake: Option<Instant>) {
    match wake {
        Some(at) => tokio::time::sleep_until(at).await,
        None => future::pending::<()>().await,
    }
}
