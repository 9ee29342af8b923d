//! # Error Module
//!
//! Error types for the duplicate image detection engine.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Recoverable vs fatal** - per-file failures become warnings and the
//!   scan continues; configuration errors abort before any work starts

use std::path::PathBuf;
use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Report generation error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur during file discovery
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// The path the failure refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            ScanError::DirectoryNotFound { path } => path,
            ScanError::PermissionDenied { path } => path,
            ScanError::ReadFailed { path, .. } => path,
        }
    }
}

/// Errors that occur while computing digests or perceptual hashes
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),

    #[error("Failed to read file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur with the fingerprint cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to open cache database at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Cache corruption detected at {path}. Delete this file and try again.")]
    Corrupted { path: PathBuf },

    #[error("Failed to serialize hash data: {0}")]
    SerializationFailed(String),
}

/// Errors that occur while serializing results
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid configuration, rejected before any scanning begins
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Similarity threshold {value} out of range (must be > 0 and <= 100)")]
    InvalidThreshold { value: f64 },

    #[error("Expected one or two directory roots, got {count}")]
    InvalidRootCount { count: usize },

    #[error("Scan root is not a directory: {path}")]
    RootNotFound { path: PathBuf },

    #[error("At least one perceptual hash algorithm must be configured")]
    NoAlgorithms,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        assert!(error.to_string().contains("/photos/vacation"));
    }

    #[test]
    fn hash_error_includes_reason() {
        let error = HashError::DecodeError {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn config_error_reports_threshold_value() {
        let error = ConfigError::InvalidThreshold { value: 150.0 };
        assert!(error.to_string().contains("150"));
    }

    #[test]
    fn cache_error_suggests_recovery() {
        let error = CacheError::Corrupted {
            path: PathBuf::from("/cache/fingerprints.db"),
        };
        assert!(error.to_string().contains("Delete this file"));
    }
}
