//! # Pipeline Module
//!
//! Orchestrates the full detection workflow:
//!
//! 1. **Scan** - discover files under one or two roots
//! 2. **Digest** - blake3 content digest for every file (cache-aware)
//! 3. **Exact match** - group by (size, digest)
//! 4. **Fingerprint** - perceptual hashes for files not exact-matched
//! 5. **Compare** - visual and filename matching over the arena
//! 6. **Aggregate** - dedupe, prioritize and order the result
//!
//! Phases 2 and 4 are parallel across files, phase 5 across pairs. The
//! output order is restored deterministically at aggregation time, not
//! by execution order.

mod executor;

pub use executor::{Engine, EngineBuilder, EngineConfig};

use crate::core::matcher::MatchPair;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A non-fatal, per-file problem encountered during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// The file that could not be fully processed
    pub path: PathBuf,
    /// Human-readable reason
    pub reason: String,
}

/// Final output of one engine invocation.
///
/// `pairs` is ordered by descending similarity (ties: method priority,
/// then path), and never contains the same unordered file pair twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Matched pairs, deduplicated and ordered
    pub pairs: Vec<MatchPair>,
    /// Skipped or partially processed files, sorted by path
    pub warnings: Vec<ScanWarning>,
    /// Total files discovered by the scanner
    pub total_files: usize,
    /// Cache hits across both hashing phases
    pub cache_hits: usize,
    /// Content digests actually computed (0 on a fully warm cache)
    pub digests_computed: usize,
    /// Perceptual fingerprint sets actually computed (0 on a warm cache)
    pub fingerprints_computed: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}
