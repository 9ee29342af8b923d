//! # image-dedup CLI
//!
//! Command-line interface for the duplicate image detection engine.
//!
//! ## Usage
//! ```bash
//! image-dedup scan ~/Pictures --threshold 90
//! image-dedup scan ~/Pictures ~/Backup --output json
//! ```

mod cli;

use image_dedup::Result;

fn main() -> Result<()> {
    image_dedup::init_tracing();
    cli::run()
}
