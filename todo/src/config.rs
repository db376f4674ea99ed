//! Application configuration.

use crate::storage::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;
use todomvc_runtime::StoreConfig;

/// Where and how the todo list is kept
#[derive(Debug, Clone)]
pub struct TodoConfig {
    /// Key the list is stored under
    pub storage_key: String,
    /// Directory for the file backend
    pub data_dir: PathBuf,
    /// Runtime settings for the store
    pub store: StoreConfig,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: std::env::temp_dir().join("todomvc"),
            store: StoreConfig::default(),
        }
    }
}

impl TodoConfig {
    /// Set the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the data directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the store configuration
    #[must_use]
    pub fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}
