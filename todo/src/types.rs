//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of items. Each item gets a stable
//! [`TodoId`] when it is created, so edits and removals never depend on where
//! the item currently sits in the list.

use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a todo item
///
/// Ids live only in memory. The persisted layout is positional, and fresh
/// ids are assigned whenever a list is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoItem {
    /// Stable identifier
    pub id: TodoId,
    /// Display text
    pub title: String,
    /// Whether the item is completed
    pub is_done: bool,
}

impl TodoItem {
    /// Creates a new, not yet completed item
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_done: false,
        }
    }

    /// Rebuilds an item from its persisted record
    #[must_use]
    pub fn from_record(id: TodoId, record: TodoRecord) -> Self {
        Self {
            id,
            title: record.title,
            is_done: record.is_done,
        }
    }

    /// The persisted form of this item
    #[must_use]
    pub fn to_record(&self) -> TodoRecord {
        TodoRecord {
            title: self.title.clone(),
            is_done: self.is_done,
        }
    }
}

/// Persisted form of a todo item: `{"title": "...", "isDone": false}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Display text
    pub title: String,
    /// Completion flag
    #[serde(rename = "isDone")]
    pub is_done: bool,
}

impl TodoRecord {
    /// Creates a record
    #[must_use]
    pub fn new(title: impl Into<String>, is_done: bool) -> Self {
        Self {
            title: title.into(),
            is_done,
        }
    }
}

/// Progress of the one-time load from storage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Hydration {
    /// `Initialize` has not been received
    #[default]
    Pending,
    /// The load effect is running
    Loading,
    /// Stored items have been adopted
    Loaded,
}

/// Reportable no-op outcomes of a command
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TodoError {
    /// No item has the given id
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// The new title is empty after trimming whitespace
    #[error("Todo title cannot be empty")]
    EmptyTitle,
}

/// State of the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoState {
    /// All todos in display order
    pub todos: Vec<TodoItem>,
    /// Selected projection (not persisted)
    pub filter: Filter,
    /// Progress of the load from storage
    pub hydration: Hydration,
    /// Outcome of the most recent rejected command
    pub last_error: Option<TodoError>,
}

impl TodoState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loaded state holding `todos`
    #[must_use]
    pub fn with_todos(todos: Vec<TodoItem>) -> Self {
        Self {
            todos,
            hydration: Hydration::Loaded,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of todos still to do
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.is_done).count()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.is_done).count()
    }

    /// Whether any todo is completed
    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|t| t.is_done)
    }

    /// Whether stored items have been adopted
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydration == Hydration::Loaded
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Current display position of a todo
    #[must_use]
    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    /// Id of the todo at a display position
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<TodoId> {
        self.todos.get(index).map(|t| t.id)
    }

    /// Todos matching `filter`, in display order
    pub fn filtered(&self, filter: Filter) -> impl Iterator<Item = &TodoItem> {
        self.todos.iter().filter(move |t| filter.matches(t))
    }

    /// Todos matching the selected filter
    pub fn visible(&self) -> impl Iterator<Item = &TodoItem> {
        self.filtered(self.filter)
    }

    /// Titles in display order
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.todos.iter().map(|t| t.title.as_str()).collect()
    }
}

/// Actions the todo reducer handles
///
/// Commands come from the UI; `Hydrated` is fed back by the load effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Load stored todos (once per session)
    Initialize,

    /// Append a todo; blank titles are ignored
    Add {
        /// Title of the todo
        title: String,
    },

    /// Replace a todo's title
    Edit {
        /// Todo to edit
        id: TodoId,
        /// New title
        title: String,
    },

    /// Flip a todo's completion flag
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },

    /// Delete a todo
    Remove {
        /// Todo to delete
        id: TodoId,
    },

    /// Delete every completed todo
    ClearCompleted,

    /// Select the visible projection
    SetFilter {
        /// Projection to show
        filter: Filter,
    },

    // ========== Feedback ==========
    /// Stored records were read
    Hydrated {
        /// Records in stored order
        records: Vec<TodoRecord>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> TodoId {
        TodoId::from_uuid(Uuid::from_u128(n))
    }

    fn sample_state() -> TodoState {
        let mut done = TodoItem::new(id(2), "점심 먹기");
        done.is_done = true;
        TodoState::with_todos(vec![
            TodoItem::new(id(1), "아침 먹기"),
            done,
            TodoItem::new(id(3), "저녁 먹기"),
        ])
    }

    #[test]
    fn todo_item_new_is_not_done() {
        let item = TodoItem::new(id(1), "Test todo");
        assert_eq!(item.title, "Test todo");
        assert!(!item.is_done);
    }

    #[test]
    fn record_uses_camel_case_flag() {
        let json = serde_json::to_string(&TodoRecord::new("아침 먹기", true)).unwrap_or_default();
        assert_eq!(json, r#"{"title":"아침 먹기","isDone":true}"#);
    }

    #[test]
    fn record_round_trips_through_item() {
        let record = TodoRecord::new("Buy milk", true);
        let item = TodoItem::from_record(id(9), record.clone());
        assert_eq!(item.id, id(9));
        assert_eq!(item.to_record(), record);
    }

    #[test]
    fn counts() {
        let state = sample_state();
        assert_eq!(state.count(), 3);
        assert_eq!(state.active_count(), 2);
        assert_eq!(state.completed_count(), 1);
        assert!(state.has_completed());
        assert!(!TodoState::new().has_completed());
    }

    #[test]
    fn position_lookups() {
        let state = sample_state();
        assert_eq!(state.position(id(3)), Some(2));
        assert_eq!(state.id_at(1), Some(id(2)));
        assert_eq!(state.id_at(3), None);
        assert!(state.exists(id(1)));
        assert!(!state.exists(id(4)));
        assert_eq!(state.get(id(2)).map(|t| t.title.as_str()), Some("점심 먹기"));
    }

    #[test]
    fn visible_follows_selected_filter() {
        let mut state = sample_state();
        assert_eq!(state.visible().count(), 3);

        state.filter = Filter::Completed;
        let titles: Vec<_> = state.visible().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["점심 먹기"]);

        state.filter = Filter::Active;
        let titles: Vec<_> = state.visible().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["아침 먹기", "저녁 먹기"]);
    }

    #[test]
    fn new_state_is_not_hydrated() {
        assert!(!TodoState::new().is_hydrated());
        assert!(TodoState::with_todos(Vec::new()).is_hydrated());
    }

    #[test]
    fn todo_error_messages() {
        assert_eq!(TodoError::EmptyTitle.to_string(), "Todo title cannot be empty");
        assert!(TodoError::NotFound(id(1)).to_string().contains("not found"));
    }
}
