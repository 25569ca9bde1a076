//! Shared test infrastructure for todo integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tempfile::TempDir;
use todos::{Item, Items, STORE_DIR, Status, Store};

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: Store,
}

impl TestEnv {
    /// Create a new test environment with an initialized store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::init(&temp_dir.path().join(STORE_DIR)).expect("Failed to init store");
        Self { temp_dir, store }
    }

    /// The store root directory.
    pub fn store_root(&self) -> PathBuf {
        self.temp_dir.path().join(STORE_DIR)
    }

    /// Create an item.
    pub fn create_item(&mut self, title: &str) -> Item {
        self.store.create(title).expect("Failed to create item")
    }

    /// Make `child` depend on `parent`.
    pub fn add_dep(&mut self, child: &Item, parent: &Item) -> Item {
        self.store
            .add_dependency(&child.id, &parent.id)
            .expect("Failed to add dependency")
    }

    /// Close an item.
    pub fn close_item(&mut self, item: &Item) -> Item {
        self.store.close(&item.id).expect("Failed to close item")
    }

    /// Assert that an item is in the ready list.
    pub fn assert_ready(&self, item: &Item) {
        let ready = self.store.ready().expect("Failed to get ready items");
        assert!(
            ready.iter().any(|i| i.id == item.id),
            "Expected item {} to be ready, but it wasn't. Ready items: {:?}",
            item.id,
            ready.iter().map(|i| &i.id).collect::<Vec<_>>()
        );
    }

    /// Assert that an item is NOT in the ready list.
    pub fn assert_not_ready(&self, item: &Item) {
        let ready = self.store.ready().expect("Failed to get ready items");
        assert!(
            !ready.iter().any(|i| i.id == item.id),
            "Expected item {} to NOT be ready, but it was",
            item.id
        );
    }

    /// Get ready items count.
    pub fn ready_count(&self) -> usize {
        self.store.ready().expect("Failed to get ready items").len()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed timestamp `secs` seconds after an arbitrary epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// Build an item without going through the store.
pub fn make_item(id: &str, title: &str, status: Status, deps: &[&str], secs: i64) -> Item {
    Item {
        id: id.to_string(),
        title: title.to_string(),
        summary: String::new(),
        status,
        deps: deps.iter().map(|d| d.to_string()).collect::<BTreeSet<_>>(),
        updated_at: at(secs),
    }
}

/// Key a list of items by id.
pub fn snapshot(items: Vec<Item>) -> Items {
    items.into_iter().map(|i| (i.id.clone(), i)).collect()
}
