//! Storage adapter between the todo list and a key-value backend.
//!
//! The list is stored as a JSON array of `{"title", "isDone"}` records under
//! a single key. Anything under that key that does not decode into that shape
//! is treated as absent.

use crate::types::{TodoItem, TodoRecord};
use std::sync::Arc;
use todomvc_core::environment::{KeyValueStore, StorageError};

/// Default key the list is stored under
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Reads and writes the todo list through a [`KeyValueStore`]
#[derive(Clone)]
pub struct TodoStorage {
    backend: Arc<dyn KeyValueStore>,
}

impl TodoStorage {
    /// Wrap a backend
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read the records stored under `key`
    ///
    /// Never fails: an absent value, a value that is not a list of records,
    /// or an unreadable backend all yield an empty list.
    #[must_use]
    pub fn load(&self, key: &str) -> Vec<TodoRecord> {
        let contents = match self.backend.get(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                tracing::debug!(key, "No stored todos");
                return Vec::new();
            },
            Err(error) => {
                tracing::warn!(key, %error, "Failed to read stored todos, starting empty");
                return Vec::new();
            },
        };

        match serde_json::from_str::<Vec<TodoRecord>>(&contents) {
            Ok(records) => {
                tracing::debug!(key, count = records.len(), "Loaded stored todos");
                records
            },
            Err(error) => {
                tracing::warn!(key, %error, "Stored todos are malformed, starting empty");
                Vec::new()
            },
        }
    }

    /// Overwrite the value under `key` with `items`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding fails or the backend rejects the write.
    pub fn save(&self, key: &str, items: &[TodoItem]) -> Result<(), StorageError> {
        let records: Vec<TodoRecord> = items.iter().map(TodoItem::to_record).collect();
        let json = serde_json::to_string(&records)?;
        self.backend.set(key, &json)?;
        tracing::debug!(key, count = records.len(), "Saved todos");
        Ok(())
    }

    /// Delete the value under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    pub fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }
}

impl std::fmt::Debug for TodoStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStorage").finish_non_exhaustive()
    }
}
