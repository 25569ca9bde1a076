//! High-level store API.
//!
//! Every operation works against an explicit store root. Mutating calls
//! rewrite the affected partition files before returning.

use crate::error::StoreError;
use crate::graph::Graph;
use crate::id::generate_id;
use crate::resolve::{resolve, resolve_among};
use crate::storage;
use crate::types::{Item, Items, Partition, Status};
use chrono::{DateTime, SubsecRound, Utc};
use eyre::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the partition files, relative to the repository root.
pub const STORE_DIR: &str = ".todos";

/// Both partitions loaded together.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    pub open: Items,
    pub closed: Items,
}

impl Snapshot {
    pub fn graph(&self) -> Graph<'_> {
        Graph::new(&self.open, &self.closed)
    }
}

/// The todo store rooted at a directory.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Create the store root and both partition files if absent. Existing
    /// files are left untouched.
    pub fn init(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;

        let store = Self {
            root: root.to_path_buf(),
        };
        for partition in [Partition::Open, Partition::Closed] {
            let path = store.path(partition);
            if !path.exists() {
                storage::save(&path, &Items::new())
                    .with_context(|| format!("Failed to create {}", partition.file_name()))?;
            }
        }

        log::info!("Initialized store at {}", root.display());
        Ok(store)
    }

    /// Open an existing store.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(eyre::eyre!(StoreError::NotInitialized {
                root: root.to_path_buf()
            }));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Path of a partition file.
    pub fn path(&self, partition: Partition) -> PathBuf {
        self.root.join(partition.file_name())
    }

    /// Load a single partition exactly as stored.
    pub fn load(&self, partition: Partition) -> Result<Items> {
        storage::load(&self.path(partition))
    }

    /// Replace a single partition.
    pub fn save(&self, partition: Partition, items: &Items) -> Result<()> {
        storage::save(&self.path(partition), items)
    }

    /// Load both partitions.
    ///
    /// `close` writes the closed file before the open file, so an interrupted
    /// close leaves the item in both. Such items are treated as closed here
    /// and the stale open copy disappears on the next write of the open file.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut open = self.load(Partition::Open)?;
        let closed = self.load(Partition::Closed)?;

        open.retain(|id, _| {
            let stale = closed.contains_key(id);
            if stale {
                log::warn!("{} is present in both partitions, treating it as closed", id);
            }
            !stale
        });

        Ok(Snapshot { open, closed })
    }

    /// Create a new open item.
    pub fn create(&mut self, title: &str) -> Result<Item> {
        let now = now();
        let snapshot = self.snapshot()?;
        let id = fresh_id(&snapshot, || generate_id(title, now));
        let mut open = snapshot.open;

        let item = Item {
            id,
            title: title.to_string(),
            summary: String::new(),
            status: Status::Open,
            deps: BTreeSet::new(),
            updated_at: now,
        };

        open.insert(item.id.clone(), item.clone());
        self.save(Partition::Open, &open).context("Failed to persist item")?;

        log::info!("Created {} {:?}", item.id, item.title);
        Ok(item)
    }

    /// Move an open item to the closed partition.
    pub fn close(&mut self, partial: &str) -> Result<Item> {
        let Snapshot { mut open, mut closed } = self.snapshot()?;
        let id = resolve(&open, partial)?;

        let mut item = open
            .remove(&id)
            .ok_or_else(|| eyre::eyre!(StoreError::UnknownId(id.clone())))?;
        item.status = Status::Closed;
        item.updated_at = now();
        closed.insert(id.clone(), item.clone());

        self.save(Partition::Closed, &closed).context("Failed to persist close")?;
        self.save(Partition::Open, &open).context("Failed to persist close")?;

        log::info!("Closed {}", id);
        Ok(item)
    }

    /// Make the open item `child` depend on `parent`.
    ///
    /// The parent may be open or closed. Adding an edge that already exists
    /// is a no-op and leaves `updated_at` alone.
    pub fn add_dependency(&mut self, child: &str, parent: &str) -> Result<Item> {
        let Snapshot { mut open, closed } = self.snapshot()?;
        let child_id = resolve(&open, child)?;
        let parent_id = resolve_among(open.keys().chain(closed.keys()).map(String::as_str), parent)?;

        let item = open
            .get_mut(&child_id)
            .ok_or_else(|| eyre::eyre!(StoreError::UnknownId(child_id.clone())))?;
        if !item.deps.insert(parent_id.clone()) {
            log::debug!("{} already depends on {}", child_id, parent_id);
            return Ok(item.clone());
        }
        item.updated_at = now();
        let item = item.clone();

        self.save(Partition::Open, &open).context("Failed to persist dependency")?;

        log::info!("{} now depends on {}", child_id, parent_id);
        Ok(item)
    }

    /// Replace the summary of an open item.
    pub fn set_summary(&mut self, partial: &str, text: &str) -> Result<Item> {
        let mut open = self.snapshot()?.open;
        let id = resolve(&open, partial)?;

        let item = open
            .get_mut(&id)
            .ok_or_else(|| eyre::eyre!(StoreError::UnknownId(id.clone())))?;
        item.summary = text.to_string();
        item.updated_at = now();
        let item = item.clone();

        self.save(Partition::Open, &open).context("Failed to persist summary")?;

        log::info!("Updated summary of {}", id);
        Ok(item)
    }

    /// Look up an item in either partition by id prefix.
    pub fn get(&self, partial: &str) -> Result<Item> {
        let snapshot = self.snapshot()?;
        let id = resolve_among(
            snapshot.open.keys().chain(snapshot.closed.keys()).map(String::as_str),
            partial,
        )?;
        snapshot
            .open
            .get(&id)
            .or_else(|| snapshot.closed.get(&id))
            .cloned()
            .ok_or_else(|| eyre::eyre!(StoreError::UnknownId(id)))
    }

    /// All items of a partition, ascending by id.
    pub fn list(&self, partition: Partition) -> Result<Vec<Item>> {
        let snapshot = self.snapshot()?;
        let items = match partition {
            Partition::Open => snapshot.open,
            Partition::Closed => snapshot.closed,
        };
        Ok(items.into_values().collect())
    }

    /// Open items whose dependencies are all closed, ascending by id.
    pub fn ready(&self) -> Result<Vec<Item>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.graph().ready().into_iter().cloned().collect())
    }

    /// Open items with at least one unsatisfied dependency, paired with the
    /// dependencies still outstanding.
    pub fn blocked(&self) -> Result<Vec<(Item, Vec<String>)>> {
        let snapshot = self.snapshot()?;
        let graph = snapshot.graph();
        Ok(graph
            .blocked()
            .into_iter()
            .map(|item| {
                let waiting = graph.unsatisfied(item).into_iter().map(String::from).collect();
                (item.clone(), waiting)
            })
            .collect())
    }
}

/// Draw ids from `next` until one is free in both partitions.
fn fresh_id(snapshot: &Snapshot, mut next: impl FnMut() -> String) -> String {
    loop {
        let id = next();
        if !snapshot.open.contains_key(&id) && !snapshot.closed.contains_key(&id) {
            return id;
        }
        log::warn!("Generated id {} is already taken, regenerating", id);
    }
}

/// Current UTC time truncated to whole seconds.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
