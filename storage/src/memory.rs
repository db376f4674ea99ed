//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use todomvc_core::environment::{KeyValueStore, StorageError};

/// In-memory key-value store
///
/// Cloning yields another handle onto the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns true if no key is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every key
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if a writer panicked while holding the lock.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .clear();
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        tracing::trace!(key, bytes = value.len(), "memory store write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("todos").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn set_overwrites_prior_value() {
        let store = MemoryStore::new();
        store.set("todos", "first").unwrap();
        store.set("todos", "second").unwrap();
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let reopened = store.clone();
        store.set("todos", "[]").unwrap();
        assert_eq!(reopened.get("todos").unwrap().as_deref(), Some("[]"));

        reopened.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("missing").unwrap();
        store.set("todos", "[]").unwrap();
        store.remove("todos").unwrap();
        assert_eq!(store.get("todos").unwrap(), None);
    }
}
