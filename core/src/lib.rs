//! # TodoMVC Core
//!
//! Core traits and types for the TodoMVC state architecture.
//!
//! This crate provides the abstractions every feature is built from: a pure
//! reducer owns all state transitions, side effects are described as values,
//! and external dependencies are injected through an environment.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user commands and effect feedback)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_core::{effect::Effect, reducer::Reducer, SmallVec, smallvec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Effects are returned inline (up to four without allocating), which
        /// covers every reducer in this workspace.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, not execution.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation whose output is fed back to the reducer
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. Production implementations of storage
/// live in the `todomvc-storage` crate; test doubles live in
/// `todomvc-testing`.
pub mod environment {
    use thiserror::Error;
    use uuid::Uuid;

    /// Errors raised by a [`KeyValueStore`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Reading or writing the underlying medium failed
        #[error("Storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// A value could not be encoded for storage
        #[error("Serialization failed: {0}")]
        Serialization(#[from] serde_json::Error),

        /// The key cannot be represented by this backend
        #[error("Invalid storage key: {0:?}")]
        InvalidKey(String),

        /// A lock guarding the backend was poisoned by a panicking writer
        #[error("Storage lock poisoned")]
        Poisoned,
    }

    /// Key-value storage - abstracts the durable local store
    ///
    /// Values are opaque text. Encoding is the caller's concern, so a
    /// backend never needs to know what it is holding.
    ///
    /// Calls are synchronous: every backend in this workspace completes
    /// without waiting on the network.
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`, or `None` if absent
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Write `value` under `key`, replacing any prior value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Delete `key`; deleting an absent key is not an error
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }

    /// Id generator - abstracts identifier creation for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - random v4 UUIDs
    /// let ids = RandomIds;
    ///
    /// // Test - predictable sequence
    /// let ids = SequentialIds::new();
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> Uuid;
    }

    /// Random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIds;

    impl IdGenerator for RandomIds {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}
