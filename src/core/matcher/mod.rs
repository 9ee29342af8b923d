//! # Matcher Module
//!
//! Turns fingerprinted files into matched pairs.
//!
//! Three independent strategies run over the same read-only candidate
//! arena:
//! - [`exact`] groups byte-identical files by (size, content digest)
//! - [`visual`] compares perceptual fingerprints by Hamming distance
//! - [`filename`] compares base filenames by edit distance
//!
//! [`aggregator`] merges the three outputs into one deduplicated,
//! deterministically ordered result. When several strategies claim the
//! same pair, the strongest evidence wins: exact > visual > similar name.

pub mod aggregator;
pub mod exact;
pub mod filename;
pub mod visual;

use crate::core::hasher::{ContentDigest, HashAlgorithmKind, ImageHashValue};
use crate::core::scanner::FileRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which detection strategies to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Content-digest matching only
    Exact,
    /// Perceptual fingerprint matching only
    Visual,
    /// Everything, including filename matching
    All,
}

impl DetectionMethod {
    pub fn includes_exact(&self) -> bool {
        matches!(self, DetectionMethod::Exact | DetectionMethod::All)
    }

    pub fn includes_visual(&self) -> bool {
        matches!(self, DetectionMethod::Visual | DetectionMethod::All)
    }

    pub fn includes_names(&self) -> bool {
        matches!(self, DetectionMethod::All)
    }
}

/// How scores combine when several fingerprint algorithms are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiAlgorithmPolicy {
    /// Best score across algorithms (most permissive)
    Any,
    /// Worst score across algorithms (most conservative)
    All,
    /// Only the first configured algorithm counts
    Primary,
}

/// The strategy that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Byte-identical content
    Exact,
    /// Perceptually similar images
    Visual,
    /// Filenames within edit-distance threshold
    SimilarName,
}

impl MatchKind {
    /// Resolution priority when strategies overlap; higher wins
    pub fn priority(&self) -> u8 {
        match self {
            MatchKind::Exact => 2,
            MatchKind::Visual => 1,
            MatchKind::SimilarName => 0,
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Visual => write!(f, "visual"),
            MatchKind::SimilarName => write!(f, "similar_name"),
        }
    }
}

/// One side of a matched pair, with the fields the exporters need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl From<&FileRecord> for PairFile {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.clone(),
            name: record.file_name(),
            size: record.size,
        }
    }
}

/// Result of comparing two files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    /// Lexicographically smaller path of the two
    pub file_a: PairFile,
    /// Lexicographically larger path of the two
    pub file_b: PairFile,
    /// Similarity in [0, 100]
    pub similarity_score: f64,
    /// The strategy that produced this pair
    pub match_type: MatchKind,
    /// Bit-distance for visual matches, 0 for exact, absent for filename
    pub hash_difference: Option<u32>,
}

impl MatchPair {
    /// Build a pair with deterministic side ordering
    pub fn new(
        a: &FileRecord,
        b: &FileRecord,
        similarity_score: f64,
        match_type: MatchKind,
        hash_difference: Option<u32>,
    ) -> Self {
        let (first, second) = if a.path <= b.path { (a, b) } else { (b, a) };
        Self {
            file_a: first.into(),
            file_b: second.into(),
            similarity_score,
            match_type,
            hash_difference,
        }
    }

    /// Unordered-pair identity, used for overlap resolution
    pub fn key(&self) -> (PathBuf, PathBuf) {
        (self.file_a.path.clone(), self.file_b.path.clone())
    }
}

/// Canonical unordered key for a pair of paths
pub fn pair_key(a: &Path, b: &Path) -> (PathBuf, PathBuf) {
    if a <= b {
        (a.to_path_buf(), b.to_path_buf())
    } else {
        (b.to_path_buf(), a.to_path_buf())
    }
}

/// A file with whatever fingerprints could be computed for it.
///
/// The matchers iterate a read-only slice of these; missing fingerprints
/// simply exclude the file from the strategies that need them.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub record: FileRecord,
    pub digest: Option<ContentDigest>,
    pub hashes: BTreeMap<HashAlgorithmKind, ImageHashValue>,
}

impl CandidateFile {
    pub fn new(record: FileRecord) -> Self {
        Self {
            record,
            digest: None,
            hashes: BTreeMap::new(),
        }
    }
}

/// Pair eligibility under the comparison mode.
///
/// Single-directory mode compares everything; two-directory mode only
/// compares across the two sets.
pub(crate) fn sets_eligible(a: &FileRecord, b: &FileRecord, cross_only: bool) -> bool {
    !cross_only || a.source != b.source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::{ImageFormat, SourceSet};
    use std::time::SystemTime;

    pub(crate) fn record(path: &str, size: u64, source: SourceSet) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            size,
            modified: SystemTime::UNIX_EPOCH,
            format: ImageFormat::Jpeg,
            source,
        }
    }

    #[test]
    fn match_pair_orders_sides_by_path() {
        let a = record("/photos/b.jpg", 10, SourceSet::First);
        let b = record("/photos/a.jpg", 20, SourceSet::First);

        let pair = MatchPair::new(&a, &b, 100.0, MatchKind::Exact, Some(0));

        assert_eq!(pair.file_a.path, PathBuf::from("/photos/a.jpg"));
        assert_eq!(pair.file_b.path, PathBuf::from("/photos/b.jpg"));
    }

    #[test]
    fn pair_key_is_unordered() {
        let key_ab = pair_key(Path::new("/a.jpg"), Path::new("/b.jpg"));
        let key_ba = pair_key(Path::new("/b.jpg"), Path::new("/a.jpg"));
        assert_eq!(key_ab, key_ba);
    }

    #[test]
    fn priority_orders_exact_first() {
        assert!(MatchKind::Exact.priority() > MatchKind::Visual.priority());
        assert!(MatchKind::Visual.priority() > MatchKind::SimilarName.priority());
    }

    #[test]
    fn match_kind_display_matches_export_names() {
        assert_eq!(MatchKind::Exact.to_string(), "exact");
        assert_eq!(MatchKind::Visual.to_string(), "visual");
        assert_eq!(MatchKind::SimilarName.to_string(), "similar_name");
    }

    #[test]
    fn method_gates_strategies() {
        assert!(DetectionMethod::Exact.includes_exact());
        assert!(!DetectionMethod::Exact.includes_visual());
        assert!(!DetectionMethod::Visual.includes_names());
        assert!(DetectionMethod::All.includes_exact());
        assert!(DetectionMethod::All.includes_visual());
        assert!(DetectionMethod::All.includes_names());
    }

    #[test]
    fn cross_only_requires_differing_sets() {
        let a = record("/a.jpg", 1, SourceSet::First);
        let b = record("/b.jpg", 1, SourceSet::First);
        let c = record("/c.jpg", 1, SourceSet::Second);

        assert!(sets_eligible(&a, &b, false));
        assert!(!sets_eligible(&a, &b, true));
        assert!(sets_eligible(&a, &c, true));
    }
}
