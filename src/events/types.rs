//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the detection pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// File discovery events
    Scan(ScanEvent),
    /// Content digest phase events
    Digest(DigestEvent),
    /// Perceptual fingerprint phase events
    Fingerprint(FingerprintEvent),
    /// Pairwise comparison events
    Compare(CompareEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during file discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { roots: Vec<PathBuf> },
    /// A supported image file was found
    FileFound { path: PathBuf },
    /// A path could not be read but scanning continues
    Skipped { path: PathBuf, reason: String },
    /// Scanning completed
    Completed { total_files: usize },
}

/// Events during content digest computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DigestEvent {
    /// Digest phase has started
    Started { total_files: usize },
    /// Progress update
    Progress(PhaseProgress),
    /// A digest was served from the cache
    CacheHit { path: PathBuf },
    /// A file could not be read; it is dropped from the scan
    Error { path: PathBuf, message: String },
    /// Digest phase completed
    Completed { digested: usize, cache_hits: usize },
}

/// Events during perceptual fingerprint computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FingerprintEvent {
    /// Fingerprint phase has started
    Started { total_files: usize },
    /// Progress update
    Progress(PhaseProgress),
    /// All requested fingerprints were served from the cache
    CacheHit { path: PathBuf },
    /// A file failed to decode; it is excluded from visual matching only
    Error { path: PathBuf, message: String },
    /// Fingerprint phase completed
    Completed {
        fingerprinted: usize,
        cache_hits: usize,
    },
}

/// Per-file progress shared by the two hashing phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseProgress {
    /// Number of files processed so far
    pub completed: usize,
    /// Total number of files in the phase
    pub total: usize,
    /// Current file being processed
    pub current_path: PathBuf,
    /// Number of cache hits so far
    pub cache_hits: usize,
}

/// Events during pairwise comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    /// Comparison has started
    Started { total_files: usize },
    /// Comparison completed
    Completed { total_matches: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Digesting,
    Fingerprinting,
    Comparing,
    Aggregating,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total files scanned
    pub total_files: usize,
    /// Number of matched pairs after aggregation
    pub total_matches: usize,
    /// Number of warnings (skipped or partially processed files)
    pub warnings: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Digesting => write!(f, "Digesting"),
            PipelinePhase::Fingerprinting => write!(f, "Fingerprinting"),
            PipelinePhase::Comparing => write!(f, "Comparing"),
            PipelinePhase::Aggregating => write!(f, "Aggregating"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Digest(DigestEvent::Progress(PhaseProgress {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/photos/a.jpg"),
            cache_hits: 3,
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Digest(DigestEvent::Progress(p)) => {
                assert_eq!(p.completed, 10);
                assert_eq!(p.cache_hits, 3);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            total_files: 1000,
            total_matches: 42,
            warnings: 1,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("1000"));
        assert!(json.contains("42"));
    }
}
