//! # TodoMVC Testing
//!
//! Testing utilities and helpers for the TodoMVC state architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_testing::{ReducerTest, SequentialIds};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::Add { title: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.count(), 1))
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use todomvc_core::environment::{IdGenerator, KeyValueStore, StorageError};
    use uuid::Uuid;

    /// Predictable id generator for deterministic tests
    ///
    /// Produces `00000000-0000-0000-0000-000000000001`, `...0002`, and so on.
    ///
    /// # Example
    ///
    /// ```
    /// use todomvc_core::environment::IdGenerator;
    /// use todomvc_testing::mocks::SequentialIds;
    ///
    /// let ids = SequentialIds::new();
    /// assert_eq!(ids.next_id().as_u128(), 1);
    /// assert_eq!(ids.next_id().as_u128(), 2);
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator starting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }

        /// The id the `n`th call (1-based) will return
        #[must_use]
        pub fn nth(n: u64) -> Uuid {
            Uuid::from_u128(u128::from(n))
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Self::nth(n)
        }
    }

    /// Key-value store whose every call fails
    ///
    /// Counts attempts so tests can check that a caller tried and coped.
    #[derive(Debug, Default)]
    pub struct FailingStore {
        attempts: AtomicUsize,
    }

    impl FailingStore {
        /// Create a failing store
        #[must_use]
        pub const fn new() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
            }
        }

        /// Number of calls made so far
        #[must_use]
        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        fn fail(&self) -> StorageError {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            StorageError::Io(std::io::Error::other("storage unavailable"))
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(self.fail())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(self.fail())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(self.fail())
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingStore, SequentialIds};
