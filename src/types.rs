//! Core data types for the todo store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A store snapshot keyed by id. Iteration order is ascending id.
pub type Items = BTreeMap<String, Item>;

/// A single tracked todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Item {
    /// Unique identifier: "td-" + 8 lowercase hex chars
    pub id: String,

    /// Short description of the work
    pub title: String,

    /// Longer free-text notes
    #[serde(default)]
    pub summary: String,

    /// Current state
    pub status: Status,

    /// Ids that must be closed before this item is ready
    #[serde(default)]
    pub deps: BTreeSet<String>,

    /// Last modification, second precision. Drives merge resolution.
    pub updated_at: DateTime<Utc>,
}

/// Item status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    Closed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Open => write!(f, "open"),
            Status::Closed => write!(f, "closed"),
        }
    }
}

/// One of the two persisted files an item can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Open,
    Closed,
}

impl Partition {
    /// File name of this partition inside the store root.
    pub fn file_name(&self) -> &'static str {
        match self {
            Partition::Open => "todos.jsonl",
            Partition::Closed => "closed.jsonl",
        }
    }
}

impl Item {
    /// True if this item is open.
    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }
}
