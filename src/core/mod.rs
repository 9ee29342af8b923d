//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - discovers image files in directories
//! - `hasher` - content digests and perceptual fingerprints
//! - `cache` - persists fingerprints to avoid recomputation
//! - `matcher` - exact, visual and filename matching plus aggregation
//! - `pipeline` - orchestrates the full workflow
//! - `reporter` - serializes results for external consumers

pub mod cache;
pub mod hasher;
pub mod matcher;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use matcher::{DetectionMethod, MatchKind, MatchPair, MultiAlgorithmPolicy};
pub use hasher::{HashAlgorithmKind, PerceptualHash};
pub use pipeline::{Engine, ScanReport, ScanWarning};
pub use scanner::FileRecord;
