//! Trailing-edge debounced autosave worker.
//!
//! Each builder session owns one worker task. Snapshots pushed through
//! the channel reset an 800ms timer; when the timer fires, only the
//! latest snapshot is saved. Snapshots arriving during the initial
//! quiet period right after the session opens are dropped, so a
//! just-loaded page never immediately re-saves itself.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;

/// Delay between the last state change and the save it triggers.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(800);

/// Grace period after spawn during which snapshots are discarded.
pub const INITIAL_QUIET: Duration = Duration::from_secs(1);

/// Lifecycle of the most recent save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    SaveFailed,
}

/// Handle to a running autosave worker.
pub struct Autosaver<T> {
    tx: mpsc::UnboundedSender<T>,
    status_rx: watch::Receiver<SaveStatus>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Autosaver<T> {
    /// Spawn the worker. `save` is invoked with the latest snapshot
    /// once the debounce window closes; failures are logged and
    /// surfaced through [`SaveStatus::SaveFailed`], never propagated.
    pub fn spawn<F, Fut>(mut save: F, cancel: CancellationToken) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);

        let handle = tokio::spawn(async move {
            // Initial quiet period: drain and drop whatever arrives.
            let quiet = tokio::time::sleep(INITIAL_QUIET);
            tokio::pin!(quiet);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = &mut quiet => break,
                    msg = rx.recv() => {
                        if msg.is_none() {
                            return;
                        }
                    }
                }
            }

            loop {
                let mut pending = tokio::select! {
                    _ = cancel.cancelled() => return,
                    msg = rx.recv() => match msg {
                        Some(snapshot) => snapshot,
                        None => return,
                    },
                };

                // Debounce: every new snapshot restarts the timer.
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(DEBOUNCE_DELAY) => break,
                        msg = rx.recv() => match msg {
                            Some(snapshot) => pending = snapshot,
                            None => break,
                        },
                    }
                }

                let _ = status_tx.send(SaveStatus::Saving);
                match save(pending).await {
                    Ok(()) => {
                        let _ = status_tx.send(SaveStatus::Saved);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "autosave failed");
                        let _ = status_tx.send(SaveStatus::SaveFailed);
                    }
                }
            }
        });

        Self {
            tx,
            status_rx,
            handle,
        }
    }

    /// Queue a snapshot. A closed worker ignores the push.
    pub fn push(&self, snapshot: T) {
        let _ = self.tx.send(snapshot);
    }

    /// Watch the save status.
    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.status_rx.clone()
    }

    /// Abort the worker task. Pending snapshots are discarded.
    pub fn abort(&self) {
        self.handle.abort();
    }
}
