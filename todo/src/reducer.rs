//! Reducer logic for the todo list.
//!
//! Every change to the list happens here. Commands that name a missing item
//! or carry an unusable title leave the list alone and record why in
//! [`TodoState::last_error`].

use crate::storage::{DEFAULT_STORAGE_KEY, TodoStorage};
use crate::types::{Hydration, TodoAction, TodoError, TodoId, TodoItem, TodoRecord, TodoState};
use std::sync::Arc;
use todomvc_core::{
    SmallVec,
    effect::Effect,
    environment::{IdGenerator, KeyValueStore, RandomIds},
    reducer::Reducer,
    smallvec,
};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where the list is loaded from
    pub storage: TodoStorage,
    /// Source of ids for new and loaded items
    pub ids: Arc<dyn IdGenerator>,
    /// Key the list is stored under
    pub storage_key: String,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(storage: TodoStorage, ids: Arc<dyn IdGenerator>, storage_key: impl Into<String>) -> Self {
        Self {
            storage,
            ids,
            storage_key: storage_key.into(),
        }
    }

    /// Production environment over `backend`: random ids, default key
    #[must_use]
    pub fn with_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::new(TodoStorage::new(backend), Arc::new(RandomIds), DEFAULT_STORAGE_KEY)
    }

    fn next_id(&self) -> TodoId {
        TodoId::from_uuid(self.ids.next_id())
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn reject(state: &mut TodoState, error: TodoError) {
        tracing::warn!(%error, "Command rejected");
        state.last_error = Some(error);
    }

    /// Adopts stored records ahead of anything added while loading
    fn hydrate(state: &mut TodoState, records: Vec<TodoRecord>, env: &TodoEnvironment) {
        let mut todos: Vec<TodoItem> = records
            .into_iter()
            .map(|record| TodoItem::from_record(env.next_id(), record))
            .collect();
        let loaded = todos.len();
        let added = state.todos.len();

        todos.append(&mut state.todos);
        state.todos = todos;
        state.hydration = Hydration::Loaded;

        tracing::info!(loaded, added, "Todo list hydrated");
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Initialize => {
                if state.hydration != Hydration::Pending {
                    tracing::debug!(hydration = ?state.hydration, "Initialize ignored");
                    return SmallVec::new();
                }

                state.hydration = Hydration::Loading;
                let storage = env.storage.clone();
                let key = env.storage_key.clone();

                smallvec![Effect::future(async move {
                    let records = storage.load(&key);
                    Some(TodoAction::Hydrated { records })
                })]
            },

            TodoAction::Hydrated { records } => {
                if state.is_hydrated() {
                    tracing::warn!(count = records.len(), "Late load result ignored");
                } else {
                    Self::hydrate(state, records, env);
                }
                SmallVec::new()
            },

            TodoAction::Add { title } => {
                if title.trim().is_empty() {
                    tracing::debug!("Blank title ignored");
                    return SmallVec::new();
                }

                let item = TodoItem::new(env.next_id(), title);
                tracing::debug!(id = %item.id, "Todo added");
                state.todos.push(item);
                state.last_error = None;
                SmallVec::new()
            },

            TodoAction::Edit { id, title } => {
                let Some(position) = state.position(id) else {
                    Self::reject(state, TodoError::NotFound(id));
                    return SmallVec::new();
                };
                if title.trim().is_empty() {
                    Self::reject(state, TodoError::EmptyTitle);
                    return SmallVec::new();
                }

                state.todos[position].title = title;
                state.last_error = None;
                SmallVec::new()
            },

            TodoAction::Toggle { id } => {
                if let Some(position) = state.position(id) {
                    let todo = &mut state.todos[position];
                    todo.is_done = !todo.is_done;
                    state.last_error = None;
                } else {
                    Self::reject(state, TodoError::NotFound(id));
                }
                SmallVec::new()
            },

            TodoAction::Remove { id } => {
                if let Some(position) = state.position(id) {
                    state.todos.remove(position);
                    state.last_error = None;
                } else {
                    Self::reject(state, TodoError::NotFound(id));
                }
                SmallVec::new()
            },

            TodoAction::ClearCompleted => {
                let before = state.todos.len();
                state.todos.retain(|t| !t.is_done);
                tracing::debug!(removed = before - state.todos.len(), "Completed todos cleared");
                state.last_error = None;
                SmallVec::new()
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },
        }
    }
}
