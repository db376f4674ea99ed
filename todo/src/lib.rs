//! A todo list store that survives restarts.
//!
//! The list lives in a [`TodoStore`]. Every change goes through a
//! [`TodoAction`] handled by [`TodoReducer`], and each committed state is
//! published to subscribers. A [`Persister`] is one such subscriber: it writes
//! the list to a key-value backend so the next session starts where this one
//! stopped.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todomvc::{Persister, TodoAction, TodoEnvironment, open_store};
//! use todomvc_runtime::StoreConfig;
//! use todomvc_storage::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::with_backend(Arc::new(MemoryStore::new()));
//! let persister = Persister::for_environment(&env);
//!
//! // Loads whatever was stored before
//! let store = open_store(env, StoreConfig::default()).await?;
//! let _saving = persister.spawn(store.subscribe_state());
//!
//! store.send(TodoAction::Add { title: "Buy milk".to_string() }).await?;
//!
//! let first = store.state(|s| s.id_at(0)).await;
//! if let Some(id) = first {
//!     store.send(TodoAction::Toggle { id }).await?;
//! }
//!
//! let remaining = store.state(|s| s.active_count()).await;
//! println!("{remaining} items left");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod filter;
pub mod persist;
pub mod reducer;
pub mod storage;
pub mod types;

pub use config::TodoConfig;
pub use filter::Filter;
pub use persist::{Persister, PersisterHandle};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::TodoStorage;
pub use types::{Hydration, TodoAction, TodoError, TodoId, TodoItem, TodoRecord, TodoState};

use todomvc_runtime::{Store, StoreConfig, StoreError};

/// Store holding one todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Create a store and load the stored list into it
///
/// Returns once the load has been applied, so the first command a caller
/// sends already sees the stored items.
///
/// # Errors
///
/// Returns [`StoreError`] if the store rejects the initial load.
pub async fn open_store(env: TodoEnvironment, config: StoreConfig) -> Result<TodoStore, StoreError> {
    let store = Store::with_config(TodoState::new(), TodoReducer::new(), env, config);

    let mut handle = store.send(TodoAction::Initialize).await?;
    handle.wait().await;

    let count = store.state(TodoState::count).await;
    tracing::info!(count, "Todo store ready");
    Ok(store)
}
