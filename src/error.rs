//! Error taxonomy for store operations.

use std::path::PathBuf;

/// Errors that can occur during store operations.
///
/// Raised through `eyre`, so callers recover the variant with
/// `err.downcast_ref::<StoreError>()`.
#[derive(Debug)]
pub enum StoreError {
    /// The store root does not exist.
    NotInitialized { root: PathBuf },
    /// No id matches the given prefix.
    UnknownId(String),
    /// More than one id matches the given prefix.
    AmbiguousId { prefix: String, candidates: Vec<String> },
    /// A stored line could not be decoded. The file is considered corrupt.
    MalformedRecord { path: PathBuf, line: usize, reason: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotInitialized { root } => {
                write!(f, "not initialized at {} (run `todo init`)", root.display())
            }
            StoreError::UnknownId(prefix) => write!(f, "unknown id: {}", prefix),
            StoreError::AmbiguousId { candidates, .. } => {
                write!(f, "ambiguous id: {}", candidates.join(", "))
            }
            StoreError::MalformedRecord { path, line, reason } => {
                write!(f, "malformed record at {}:{}: {}", path.display(), line, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {}
