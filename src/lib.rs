//! Todos: a git-friendly todo store with dependency links.
//!
//! Items live in two sorted JSONL files under `.todos/`, one for open items
//! and one for closed items. A custom three-way merge driver lets diverging
//! branches converge without conflict markers.
//!
//! # Example
//!
//! ```no_run
//! use todos::{Partition, Store};
//! use std::path::Path;
//!
//! let mut store = Store::init(Path::new(".todos")).unwrap();
//!
//! let design = store.create("Write design doc").unwrap();
//! let build = store.create("Build it").unwrap();
//! store.add_dependency(&build.id, &design.id).unwrap();
//!
//! // Only the design doc is ready
//! let ready = store.ready().unwrap();
//! assert_eq!(ready.len(), 1);
//! assert_eq!(ready[0].id, design.id);
//!
//! // Prefixes work wherever an id is expected
//! store.close(&design.id[..6]).unwrap();
//! assert_eq!(store.list(Partition::Closed).unwrap().len(), 1);
//! ```

mod error;
mod graph;
mod id;
mod resolve;
mod store;
mod types;

pub mod git;
pub mod merge;
pub mod storage;

// Re-export public API
pub use error::StoreError;
pub use graph::Graph;
pub use id::{generate_id, is_valid_id};
pub use merge::{MergeReport, merge, merge_files};
pub use resolve::{resolve, resolve_among};
pub use store::{STORE_DIR, Snapshot, Store};
pub use types::{Item, Items, Partition, Status};
