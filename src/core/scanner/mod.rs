//! # Scanner Module
//!
//! Discovers image files in one or two directory roots.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - GIF (.gif)
//! - WebP (.webp)
//! - BMP (.bmp)
//! - TIFF (.tiff)
//!
//! Each discovered file becomes a [`FileRecord`] stub: identity populated,
//! fingerprints computed later by the hashing phases.

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// Which directory root a file came from.
///
/// In two-directory mode, comparisons are restricted to pairs that span
/// both sets; single-directory scans tag everything `First`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceSet {
    First,
    Second,
}

/// Identity of one scanned file, before fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path to the image file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modified time
    pub modified: SystemTime,
    /// Detected image format
    pub format: ImageFormat,
    /// Which directory root produced this record
    pub source: SourceSet,
}

impl FileRecord {
    /// Base filename without extension, used for filename matching
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Full filename including extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "bmp" => ImageFormat::Bmp,
            "tiff" => ImageFormat::Tiff,
            _ => ImageFormat::Unknown,
        }
    }

    /// Check if this format is supported
    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanOutcome {
    /// Successfully discovered files
    pub files: Vec<FileRecord>,
    /// Per-path failures that did not abort the scan
    pub errors: Vec<ScanError>,
}

/// Trait for file scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait FileScanner: Send + Sync {
    /// Scan directory roots and return discovered files.
    ///
    /// `roots[0]` is tagged [`SourceSet::First`], `roots[1]` (if present)
    /// [`SourceSet::Second`].
    fn scan(&self, roots: &[PathBuf]) -> ScanOutcome;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, roots: &[PathBuf], events: &EventSender) -> ScanOutcome;
}
