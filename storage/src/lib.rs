//! # TodoMVC Storage
//!
//! Key-value backends implementing
//! [`KeyValueStore`](todomvc_core::environment::KeyValueStore).
//!
//! - [`MemoryStore`]: process-local map. Clones share the same map, so a
//!   "fresh session" in tests can reopen the store another session wrote.
//! - [`FileStore`]: one file per key under a data directory, durable across
//!   processes.
//!
//! ## Example
//!
//! ```
//! use todomvc_core::environment::KeyValueStore;
//! use todomvc_storage::MemoryStore;
//!
//! # fn main() -> Result<(), todomvc_core::environment::StorageError> {
//! let store = MemoryStore::new();
//! store.set("todos", "[]")?;
//! assert_eq!(store.get("todos")?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
