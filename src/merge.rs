//! Three-way merge driver for store partitions.
//!
//! Git invokes the driver for each partition file through `.gitattributes`:
//!
//! ```text
//! .todos/todos.jsonl merge=todo
//! .todos/closed.jsonl merge=todo
//! ```
//!
//! with `merge.todo.driver = todo merge %O %A %B` in the git config. The
//! result is written over `%A`.
//!
//! Resolution is whole-record last-writer-wins on `updated_at`, ties going to
//! ours. Timestamps are compared as instants, not as their encoded text.
//! Fields are never merged individually, and each partition is merged on its
//! own.

use crate::storage;
use crate::types::{Item, Items};
use eyre::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Counts of how each id in the union was resolved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Ours kept: only ours had it, or ours was at least as recent.
    pub kept_ours: usize,
    /// Theirs was strictly newer, or only theirs had it.
    pub took_theirs: usize,
    /// Present in base only.
    pub dropped: usize,
}

/// Reconcile two divergent snapshots given their common ancestor.
pub fn merge(base: &Items, ours: &Items, theirs: &Items) -> (Items, MergeReport) {
    let ids: BTreeSet<&String> = base.keys().chain(ours.keys()).chain(theirs.keys()).collect();

    let mut merged = Items::new();
    let mut report = MergeReport::default();

    for id in ids {
        let winner: &Item = match (ours.get(id), theirs.get(id)) {
            (None, None) => {
                report.dropped += 1;
                continue;
            }
            (Some(a), None) => {
                report.kept_ours += 1;
                a
            }
            (Some(a), Some(b)) if a.updated_at >= b.updated_at => {
                report.kept_ours += 1;
                a
            }
            (_, Some(b)) => {
                report.took_theirs += 1;
                b
            }
        };
        merged.insert(id.clone(), winner.clone());
    }

    (merged, report)
}

/// Run the merge driver over three partition files, writing the result over
/// `ours`.
///
/// All three inputs are fully decoded before anything is written. A missing
/// input is an empty snapshot.
pub fn merge_files(base: &Path, ours: &Path, theirs: &Path) -> Result<MergeReport> {
    log::info!(
        "Merge driver invoked: base={} ours={} theirs={}",
        base.display(),
        ours.display(),
        theirs.display()
    );

    let base_items = storage::load(base).context("Failed to load base snapshot")?;
    let ours_items = storage::load(ours).context("Failed to load ours snapshot")?;
    let theirs_items = storage::load(theirs).context("Failed to load theirs snapshot")?;

    let (merged, report) = merge(&base_items, &ours_items, &theirs_items);

    storage::save(ours, &merged).context("Failed to write merged snapshot")?;

    log::info!(
        "Merge complete: {} records (kept ours {}, took theirs {}, dropped {})",
        merged.len(),
        report.kept_ours,
        report.took_theirs,
        report.dropped
    );
    Ok(report)
}
