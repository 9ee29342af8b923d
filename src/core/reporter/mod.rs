//! # Reporter Module
//!
//! Serializes a scan result for external consumers. The engine itself
//! never acts on the result; the CSV form exists for the exporter
//! collaborator and for archiving.

mod export;

pub use export::{export_csv, export_to_file};
