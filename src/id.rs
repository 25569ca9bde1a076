//! ID generation for todo items.

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix shared by every item id.
pub const ID_PREFIX: &str = "td-";

/// Number of hex chars after the prefix.
const ID_HEX_LEN: usize = 8;

/// Generate a unique ID from content + entropy.
/// Format: "td-" + 8 hex chars of SHA256(title + timestamp + random)
pub fn generate_id(title: &str, created_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(created_at.timestamp_nanos_opt().unwrap_or(0).to_le_bytes());
    hasher.update(rand::rng().random::<[u8; 8]>());
    let hash = hasher.finalize();
    format!(
        "{}{:08x}",
        ID_PREFIX,
        u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
    )
}

/// Check that `id` has the canonical "td-xxxxxxxx" shape.
pub fn is_valid_id(id: &str) -> bool {
    match id.strip_prefix(ID_PREFIX) {
        Some(hex) => hex.len() == ID_HEX_LEN && hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')),
        None => false,
    }
}
