//! Writes the list back to storage whenever it changes.
//!
//! The [`Persister`] subscribes to the store's state snapshots. Snapshots
//! taken before the stored list was loaded are never written, so an empty
//! start-up state cannot overwrite saved todos.

use crate::reducer::TodoEnvironment;
use crate::storage::TodoStorage;
use crate::types::{TodoItem, TodoState};
use std::sync::Arc;
use std::time::Duration;
use todomvc_core::environment::StorageError;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Saves the todo list under one key
#[derive(Clone, Debug)]
pub struct Persister {
    storage: TodoStorage,
    key: String,
}

impl Persister {
    /// Persist through `storage` under `key`
    #[must_use]
    pub fn new(storage: TodoStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Persist to the same place the environment loads from
    #[must_use]
    pub fn for_environment(env: &TodoEnvironment) -> Self {
        Self::new(env.storage.clone(), env.storage_key.clone())
    }

    /// Save `state` now
    ///
    /// Returns `Ok(false)` without writing if the stored list has not been
    /// loaded into `state` yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    pub fn flush(&self, state: &TodoState) -> Result<bool, StorageError> {
        if !state.is_hydrated() {
            tracing::debug!(hydration = ?state.hydration, "Skipping save before load");
            return Ok(false);
        }
        self.storage.save(&self.key, &state.todos)?;
        Ok(true)
    }

    /// Save every snapshot whose list differs from the last one saved
    ///
    /// Runs until the store behind `snapshots` is dropped or the handle is
    /// closed. Writes run on the blocking pool since backends may touch the
    /// filesystem. Failed saves are logged and retried with the next change.
    #[must_use]
    pub fn spawn(self, mut snapshots: watch::Receiver<Arc<TodoState>>) -> PersisterHandle {
        let (saves_tx, saves) = watch::channel(0u64);
        let (close, mut close_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut saved: Option<Vec<TodoItem>> = None;
            let mut closing = false;
            let mut listening = true;

            loop {
                let snapshot = snapshots.borrow_and_update().clone();

                match self.save_if_changed(snapshot, &mut saved).await {
                    Ok(true) => saves_tx.send_modify(|n| *n += 1),
                    Ok(false) => {},
                    Err(error) if closing => return Err(error),
                    Err(error) => {
                        tracing::error!(key = %self.key, %error, "Failed to save todos");
                    },
                }

                if closing {
                    tracing::debug!("Persister closed");
                    return Ok(());
                }

                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            tracing::debug!("Store dropped, persister stopping");
                            return Ok(());
                        }
                    },
                    signal = &mut close_rx, if listening => match signal {
                        Ok(()) => closing = true,
                        // Handle dropped without closing: keep following the store
                        Err(_) => listening = false,
                    },
                }
            }
        });

        PersisterHandle { task, saves, close }
    }

    async fn save_if_changed(
        &self,
        snapshot: Arc<TodoState>,
        saved: &mut Option<Vec<TodoItem>>,
    ) -> Result<bool, StorageError> {
        if !snapshot.is_hydrated() || saved.as_ref() == Some(&snapshot.todos) {
            return Ok(false);
        }

        let persister = self.clone();
        let state = Arc::clone(&snapshot);
        tokio::task::spawn_blocking(move || persister.flush(&state))
            .await
            .map_err(|error| StorageError::Io(std::io::Error::other(error)))??;

        *saved = Some(snapshot.todos.clone());
        Ok(true)
    }
}

/// Handle to a running [`Persister`]
///
/// Dropping the handle leaves the persister running until the store goes
/// away; [`close`](Self::close) stops it after a final save.
#[derive(Debug)]
pub struct PersisterHandle {
    task: JoinHandle<Result<(), StorageError>>,
    saves: watch::Receiver<u64>,
    close: oneshot::Sender<()>,
}

impl PersisterHandle {
    /// Number of successful saves so far
    #[must_use]
    pub fn saves(&self) -> u64 {
        *self.saves.borrow()
    }

    /// Wait until at least `count` saves have completed
    ///
    /// Returns `false` if `timeout` expires first or the persister stopped.
    pub async fn wait_for_saves(&mut self, count: u64, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, self.saves.wait_for(|n| *n >= count)).await,
            Ok(Ok(_))
        )
    }

    /// Whether the persister loop has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the persister once the latest list is saved
    ///
    /// Lets any save in progress finish, then writes the newest snapshot if
    /// it differs from what was last saved.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the final save fails or the persister task
    /// panicked.
    pub async fn close(self) -> Result<(), StorageError> {
        // Already stopped if the store was dropped
        let _ = self.close.send(());

        match self.task.await {
            Ok(result) => result,
            Err(error) if error.is_cancelled() => Ok(()),
            Err(error) => Err(StorageError::Io(std::io::Error::other(error))),
        }
    }

    /// Stop saving immediately
    pub fn abort(&self) {
        self.task.abort();
    }
}
