//! Read-side projections of the list.

use crate::types::TodoItem;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which todos a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet done
    Active,
    /// Todos already done
    Completed,
}

impl Filter {
    /// Every filter, in the order a footer lists them
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether `task` belongs in this projection
    #[must_use]
    pub const fn matches(self, task: &TodoItem) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.is_done,
            Filter::Completed => task.is_done,
        }
    }

    /// Footer label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Unknown filter name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter {0:?} (expected all, active or completed)")]
pub struct ParseFilterError(String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
