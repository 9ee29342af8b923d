//! # Cache Module
//!
//! Persists content digests and perceptual fingerprints so repeated
//! scans of unchanged files skip the expensive recomputation.
//!
//! Entries are keyed by path and validated against the file's current
//! size and modification time; a mismatch is not an error, it simply
//! reads as a miss and the caller recomputes. A cold cache must produce
//! identical scan results to a warm one, only slower.
//!
//! ## Backends
//! - `SqliteCache` - persistent storage across sessions
//! - `InMemoryCache` - session-scoped, also used in tests

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryCache;
pub use sqlite::SqliteCache;
pub use traits::CacheBackend;

use crate::core::hasher::HashAlgorithmKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// A cached fingerprint entry for one file.
///
/// The two halves are populated independently: the digest during the
/// content-hash phase, the perceptual map during the fingerprint phase
/// (and only for files that were not exact-matched).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Path to the image file
    pub path: PathBuf,
    /// File size at time of hashing
    pub file_size: u64,
    /// File modification time at time of hashing
    pub file_modified: SystemTime,
    /// Content digest bytes, if computed
    pub content_digest: Option<Vec<u8>>,
    /// Perceptual hash bytes per algorithm, if computed
    pub perceptual_hashes: BTreeMap<HashAlgorithmKind, Vec<u8>>,
    /// When the entry was cached
    pub cached_at: SystemTime,
}

impl CacheEntry {
    /// Create an empty entry for a file identity
    pub fn new(path: PathBuf, file_size: u64, file_modified: SystemTime) -> Self {
        Self {
            path,
            file_size,
            file_modified,
            content_digest: None,
            perceptual_hashes: BTreeMap::new(),
            cached_at: SystemTime::now(),
        }
    }

    /// Check if this entry is still valid for a file.
    ///
    /// Timestamps are compared at second precision (SQLite stores seconds).
    pub fn is_valid_for(&self, file_size: u64, file_modified: SystemTime) -> bool {
        let cached_secs = self
            .file_modified
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let current_secs = file_modified
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.file_size == file_size && cached_secs == current_secs
    }

    /// Check if all requested algorithms are present
    pub fn has_perceptual(&self, algorithms: &[HashAlgorithmKind]) -> bool {
        algorithms
            .iter()
            .all(|kind| self.perceptual_hashes.contains_key(kind))
    }

    /// Stored bytes for size accounting
    pub fn payload_len(&self) -> u64 {
        let digest = self.content_digest.as_ref().map(|d| d.len()).unwrap_or(0);
        let perceptual: usize = self.perceptual_hashes.values().map(|h| h.len()).sum();
        (digest + perceptual) as u64
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Total size of cached hash data in bytes
    pub total_size_bytes: u64,
    /// Oldest entry timestamp
    pub oldest_entry: Option<SystemTime>,
    /// Newest entry timestamp
    pub newest_entry: Option<SystemTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(size: u64, modified: SystemTime) -> CacheEntry {
        CacheEntry::new(PathBuf::from("/test.jpg"), size, modified)
    }

    #[test]
    fn cache_entry_valid_when_unchanged() {
        let now = SystemTime::now();
        assert!(entry_with(1000, now).is_valid_for(1000, now));
    }

    #[test]
    fn cache_entry_invalid_when_size_changed() {
        let now = SystemTime::now();
        assert!(!entry_with(1000, now).is_valid_for(2000, now));
    }

    #[test]
    fn cache_entry_invalid_when_modified() {
        let now = SystemTime::now();
        let later = now + std::time::Duration::from_secs(60);
        assert!(!entry_with(1000, now).is_valid_for(1000, later));
    }

    #[test]
    fn has_perceptual_requires_all_kinds() {
        let mut entry = entry_with(1000, SystemTime::now());
        entry
            .perceptual_hashes
            .insert(HashAlgorithmKind::Average, vec![0xFF; 8]);

        assert!(entry.has_perceptual(&[HashAlgorithmKind::Average]));
        assert!(!entry.has_perceptual(&[
            HashAlgorithmKind::Average,
            HashAlgorithmKind::Wavelet
        ]));
        assert!(entry.has_perceptual(&[]));
    }

    #[test]
    fn payload_len_counts_both_halves() {
        let mut entry = entry_with(1000, SystemTime::now());
        entry.content_digest = Some(vec![0u8; 32]);
        entry
            .perceptual_hashes
            .insert(HashAlgorithmKind::Difference, vec![0u8; 8]);

        assert_eq!(entry.payload_len(), 40);
    }
}
