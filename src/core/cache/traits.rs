//! Cache backend trait definition.

use super::{CacheEntry, CacheStats};
use crate::error::CacheError;
use std::path::Path;
use std::time::SystemTime;

/// Trait for cache backends.
///
/// Backends must support concurrent readers; writes for the same key may
/// race, in which case last-writer-wins is acceptable because the values
/// are deterministic functions of the same file bytes.
pub trait CacheBackend: Send + Sync {
    /// Get a cached entry if it exists and is still valid.
    ///
    /// The entry is only returned if the file's size and modification
    /// time still match what was recorded at hashing time; a stale entry
    /// reads as a miss and is recomputed by the caller.
    fn get(
        &self,
        path: &Path,
        current_size: u64,
        current_modified: SystemTime,
    ) -> Result<Option<CacheEntry>, CacheError>;

    /// Store an entry, replacing any previous one for the same path
    fn set(&self, entry: CacheEntry) -> Result<(), CacheError>;

    /// Remove a specific entry
    fn remove(&self, path: &Path) -> Result<(), CacheError>;

    /// Clear all cached entries
    fn clear(&self) -> Result<(), CacheError>;

    /// Get cache statistics
    fn stats(&self) -> Result<CacheStats, CacheError>;

    /// Remove entries for files that no longer exist.
    ///
    /// Returns the number of entries removed.
    fn prune_orphans(&self) -> Result<usize, CacheError>;
}
