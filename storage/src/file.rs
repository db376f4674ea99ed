//! File-backed key-value store.
//!
//! Each key is stored as `<dir>/<key>.json`. Every write lands in its own
//! uniquely named temporary file in the same directory and is renamed over
//! the target, so a reader never sees a half-written value and concurrent
//! writers to one key never share a staging file. The last rename wins.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use todomvc_core::environment::{KeyValueStore, StorageError};

/// Extension given to every value file
const VALUE_EXTENSION: &str = "json";

/// File-backed key-value store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if `key` is empty, is `.` or `..`,
    /// or contains anything other than ASCII letters, digits, `_`, `-` and `.`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if key.is_empty() || key == "." || key == ".." || !valid_chars {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let mut staging = tempfile::NamedTempFile::new_in(&self.dir)?;
        staging.write_all(value.as_bytes())?;
        staging.persist(&path).map_err(|error| error.error)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "file store write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
