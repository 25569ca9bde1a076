//! Prefix-based id resolution.
//!
//! Users refer to items by any unambiguous prefix of their id, the same way
//! git accepts abbreviated commit hashes.

use crate::error::StoreError;
use crate::types::Items;
use eyre::Result;

/// Resolve `partial` against the ids of a single snapshot.
pub fn resolve(items: &Items, partial: &str) -> Result<String> {
    resolve_among(items.keys().map(String::as_str), partial)
}

/// Resolve `partial` against an arbitrary set of ids.
///
/// An exact match wins outright, even when the same string is also a prefix
/// of other ids. Otherwise exactly one prefix match is required.
pub fn resolve_among<'a, I>(ids: I, partial: &str) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates: Vec<&str> = Vec::new();
    for id in ids {
        if id == partial {
            return Ok(id.to_string());
        }
        if id.starts_with(partial) {
            candidates.push(id);
        }
    }

    candidates.sort_unstable();
    candidates.dedup();

    match candidates.as_slice() {
        [] => Err(eyre::eyre!(StoreError::UnknownId(partial.to_string()))),
        [only] => Ok(only.to_string()),
        many => Err(eyre::eyre!(StoreError::AmbiguousId {
            prefix: partial.to_string(),
            candidates: many.iter().map(|id| id.to_string()).collect(),
        })),
    }
}
