//! Storage layer: sorted JSONL files with atomic replace.

use crate::error::StoreError;
use crate::id::is_valid_id;
use crate::types::{Item, Items};
use eyre::{Context, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Load every record in `path`, keyed by id.
///
/// A missing file is an empty snapshot. Any undecodable line fails the whole
/// load with [`StoreError::MalformedRecord`].
pub fn load(path: &Path) -> Result<Items> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} does not exist, treating as empty", path.display());
            return Ok(Items::new());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to open {}", path.display())),
    };

    let mut items = Items::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| malformed(path, line_no, e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let item: Item = serde_json::from_str(&line).map_err(|e| malformed(path, line_no, e.to_string()))?;
        if !is_valid_id(&item.id) {
            return Err(malformed(path, line_no, format!("invalid id '{}'", item.id)));
        }

        if let Some(previous) = items.insert(item.id.clone(), item) {
            log::warn!(
                "Duplicate id {} in {} at line {}, keeping the later record",
                previous.id,
                path.display(),
                line_no
            );
        }
    }

    log::debug!("Loaded {} records from {}", items.len(), path.display());
    Ok(items)
}

/// Write `items` to `path`, one compact JSON record per line in ascending id
/// order.
///
/// The data goes to a temp file in the target's directory and is renamed over
/// `path`, so readers see either the old file or the new one.
pub fn save(path: &Path, items: &Items) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let temp = NamedTempFile::new_in(dir).with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        for item in items.values() {
            let json = serde_json::to_string(item).context("Failed to serialize item")?;
            writeln!(writer, "{}", json).context("Failed to write record")?;
        }
        writer.flush().context("Failed to flush records")?;
    }
    temp.as_file().sync_all().context("Failed to sync temp file")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    log::debug!("Saved {} records to {}", items.len(), path.display());
    Ok(())
}

fn malformed(path: &Path, line: usize, reason: String) -> eyre::Report {
    eyre::eyre!(StoreError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason,
    })
}
