//! Git integration: repository discovery and merge driver registration.

use eyre::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Label tying `.gitattributes` entries to the driver in git config.
pub const MERGE_DRIVER: &str = "todo";

/// Command git runs for a conflicted partition file.
pub const MERGE_DRIVER_COMMAND: &str = "todo merge %O %A %B";

/// Top level of the git work tree containing `dir`, if any.
pub fn toplevel(dir: &Path) -> Option<PathBuf> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--show-toplevel"])
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() { None } else { Some(PathBuf::from(root)) }
}

/// Make sure `.gitattributes` in `repo_root` routes every partition file in
/// `files` through the merge driver. Existing lines are left alone.
///
/// Returns the number of lines appended.
pub fn ensure_gitattributes(repo_root: &Path, files: &[PathBuf]) -> Result<usize> {
    let path = repo_root.join(".gitattributes");
    let existing = if path.exists() {
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };

    let missing: Vec<String> = files
        .iter()
        .map(|file| attribute_line(repo_root, file))
        .filter(|entry| !existing.lines().any(|l| l.trim() == entry.as_str()))
        .collect();

    if missing.is_empty() {
        return Ok(0);
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    for entry in &missing {
        writeln!(file, "{}", entry)?;
    }

    log::info!("Added {} merge driver entries to {}", missing.len(), path.display());
    Ok(missing.len())
}

/// Register the merge driver in the repository's local git config.
pub fn register_merge_driver(repo_root: &Path) -> Result<()> {
    let settings = [
        (format!("merge.{}.name", MERGE_DRIVER), "todo last-writer-wins merge driver"),
        (format!("merge.{}.driver", MERGE_DRIVER), MERGE_DRIVER_COMMAND),
    ];

    for (key, value) in &settings {
        let status = Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .arg("config")
            .arg(key)
            .arg(value)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("Failed to run git config")?;
        if !status.success() {
            eyre::bail!("git config {} failed with status {}", key, status.code().unwrap_or(-1));
        }
    }

    log::info!("Registered merge driver '{}' in {}", MERGE_DRIVER, repo_root.display());
    Ok(())
}

/// `.gitattributes` line for `file`, path relative to the repository root
/// with forward slashes.
fn attribute_line(repo_root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(repo_root).unwrap_or(file);
    let pattern = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{} merge={}", pattern, MERGE_DRIVER)
}
