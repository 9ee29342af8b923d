//! # image-dedup
//!
//! A duplicate and near-duplicate image detection engine.
//!
//! Given one or two directories of images, the engine produces a ranked
//! list of matched file pairs using three independent strategies:
//! - **Exact** - byte-identical files, certified by a content digest
//! - **Visual** - perceptually similar images, found via bit-vector fingerprints
//! - **Similar name** - filenames within a configurable edit distance
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - scanning, hashing, matching and aggregation
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - error types
//!
//! The engine never deletes, moves or copies files. It only emits
//! recommendations; acting on them is the caller's business.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{EngineError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
