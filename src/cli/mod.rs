//! # CLI Module
//!
//! Command-line interface for the duplicate image detection engine.
//!
//! ## Usage
//! ```bash
//! # Scan a directory for duplicates
//! image-dedup scan ~/Pictures
//!
//! # Compare two directories against each other
//! image-dedup scan ~/Pictures ~/Backup
//!
//! # Visual matching only, custom threshold, CSV export
//! image-dedup scan ~/Pictures --method visual --threshold 90 --csv report.csv
//!
//! # Cache maintenance
//! image-dedup cache stats
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_dedup::core::cache::{CacheBackend, InMemoryCache, SqliteCache};
use image_dedup::core::hasher::HashAlgorithmKind;
use image_dedup::core::matcher::{DetectionMethod, MatchKind, MultiAlgorithmPolicy};
use image_dedup::core::pipeline::{Engine, ScanReport};
use image_dedup::core::reporter;
use image_dedup::error::Result;
use image_dedup::events::{
    DigestEvent, Event, EventChannel, FingerprintEvent, PipelineEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

/// Duplicate image finder - exact, visual and filename matching
#[derive(Parser, Debug)]
#[command(name = "image-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan one directory, or compare two against each other
    Scan {
        /// Directory roots (one or two)
        #[arg(required = true, num_args = 1..=2)]
        roots: Vec<PathBuf>,

        /// Detection method
        #[arg(short, long, default_value = "all")]
        method: Method,

        /// Visual similarity threshold in (0, 100], inclusive boundary
        #[arg(short, long, default_value = "85.0")]
        threshold: f64,

        /// Separate filename similarity threshold (defaults to --threshold)
        #[arg(long)]
        name_threshold: Option<f64>,

        /// Fingerprint algorithms; repeat for several, first is primary
        #[arg(short, long = "algorithm")]
        algorithms: Vec<Algorithm>,

        /// How scores combine across algorithms
        #[arg(short, long, default_value = "primary")]
        policy: Policy,

        /// Fingerprint grid size (bits per side)
        #[arg(long, default_value = "8")]
        hash_size: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Write matched pairs to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Cache database path
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Run with a session-only in-memory cache
        #[arg(long)]
        no_cache: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect or maintain the fingerprint cache
    Cache {
        /// Cache database path
        #[arg(long)]
        cache: Option<PathBuf>,

        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Show entry counts and sizes
    Stats,
    /// Delete all cached fingerprints
    Clear,
    /// Drop entries for files that no longer exist
    Prune,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Content-digest matching only
    Exact,
    /// Perceptual fingerprint matching only
    Visual,
    /// Everything, including filename matching
    All,
}

impl From<Method> for DetectionMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Exact => DetectionMethod::Exact,
            Method::Visual => DetectionMethod::Visual,
            Method::All => DetectionMethod::All,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Average hash - fastest
    Average,
    /// DCT-based perceptual hash - most robust
    Perceptual,
    /// Difference hash - good balance
    Difference,
    /// Haar wavelet hash
    Wavelet,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Wavelet => HashAlgorithmKind::Wavelet,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Best score across algorithms
    Any,
    /// Worst score across algorithms
    All,
    /// First configured algorithm only
    Primary,
}

impl From<Policy> for MultiAlgorithmPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Any => MultiAlgorithmPolicy::Any,
            Policy::All => MultiAlgorithmPolicy::All,
            Policy::Primary => MultiAlgorithmPolicy::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Tab-separated pairs only
    Minimal,
}

fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("image-dedup")
        .join("fingerprints.db")
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            roots,
            method,
            threshold,
            name_threshold,
            algorithms,
            policy,
            hash_size,
            output,
            csv,
            cache,
            no_cache,
            include_hidden,
            verbose,
        } => {
            let algorithms: Vec<HashAlgorithmKind> = if algorithms.is_empty() {
                vec![HashAlgorithmKind::Average]
            } else {
                algorithms.into_iter().map(Into::into).collect()
            };

            run_scan(ScanOptions {
                roots,
                method: method.into(),
                threshold,
                name_threshold,
                algorithms,
                policy: policy.into(),
                hash_size,
                output,
                csv,
                cache,
                no_cache,
                include_hidden,
                verbose,
            })
        }
        Commands::Cache { cache, command } => run_cache(cache, command),
    }
}

struct ScanOptions {
    roots: Vec<PathBuf>,
    method: DetectionMethod,
    threshold: f64,
    name_threshold: Option<f64>,
    algorithms: Vec<HashAlgorithmKind>,
    policy: MultiAlgorithmPolicy,
    hash_size: u32,
    output: OutputFormat,
    csv: Option<PathBuf>,
    cache: Option<PathBuf>,
    no_cache: bool,
    include_hidden: bool,
    verbose: bool,
}

fn open_cache(path: Option<PathBuf>, no_cache: bool) -> Result<Arc<dyn CacheBackend>> {
    if no_cache {
        return Ok(Arc::new(InMemoryCache::new()));
    }
    let path = path.unwrap_or_else(default_cache_path);
    Ok(Arc::new(SqliteCache::open(&path)?))
}

fn run_scan(options: ScanOptions) -> Result<()> {
    let term = Term::stderr();

    if matches!(options.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("image-dedup").bold().cyan(),
            style(env!("CARGO_PKG_VERSION")).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let cache = open_cache(options.cache.clone(), options.no_cache)?;

    let mut builder = Engine::builder()
        .roots(options.roots.clone())
        .method(options.method)
        .similarity_threshold(options.threshold)
        .algorithms(options.algorithms.clone())
        .policy(options.policy)
        .hash_size(options.hash_size)
        .include_hidden(options.include_hidden)
        .cache(cache);

    if let Some(name_threshold) = options.name_threshold {
        builder = builder.filename_threshold(name_threshold);
    }

    let engine = builder.build();

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(options.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = options.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else { continue };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Digest(DigestEvent::Started { total_files })
                | Event::Fingerprint(FingerprintEvent::Started { total_files }) => {
                    pb.set_length(total_files as u64);
                    pb.set_position(0);
                }
                Event::Digest(DigestEvent::Progress(p))
                | Event::Fingerprint(FingerprintEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!(
                            "{} (cache: {})",
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy(),
                            p.cache_hits
                        ));
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = engine.run_with_events(&sender);

    drop(sender);
    event_thread.join().ok();

    let report = result?;

    if let Some(ref csv_path) = options.csv {
        reporter::export_to_file(&report.pairs, csv_path)?;
        if matches!(options.output, OutputFormat::Pretty) {
            term.write_line(&format!(
                "{} Wrote {} pairs to {}",
                style("✓").green(),
                report.pairs.len(),
                csv_path.display()
            ))
            .ok();
        }
    }

    match options.output {
        OutputFormat::Pretty => print_pretty_results(&term, &report),
        OutputFormat::Json => print_json_results(&report),
        OutputFormat::Minimal => print_minimal_results(&report),
    }

    Ok(())
}

fn run_cache(path: Option<PathBuf>, command: CacheCommands) -> Result<()> {
    let path = path.unwrap_or_else(default_cache_path);
    let cache = SqliteCache::open(&path)?;
    let term = Term::stdout();

    match command {
        CacheCommands::Stats => {
            let stats = cache.stats()?;
            term.write_line(&format!("Cache: {}", path.display())).ok();
            term.write_line(&format!("  {} entries", stats.total_entries))
                .ok();
            term.write_line(&format!("  {} of hash data", format_bytes(stats.total_size_bytes)))
                .ok();
        }
        CacheCommands::Clear => {
            cache.clear()?;
            term.write_line("Cache cleared").ok();
        }
        CacheCommands::Prune => {
            let removed = cache.prune_orphans()?;
            term.write_line(&format!("Removed {} orphaned entries", removed))
                .ok();
        }
    }

    Ok(())
}

fn print_pretty_results(term: &Term, report: &ScanReport) {
    term.write_line("").ok();
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {:.1}s",
        style(report.total_files).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} matched pairs",
        style(report.pairs.len()).cyan()
    ))
    .ok();
    if report.cache_hits > 0 {
        term.write_line(&format!("  {} cache hits", style(report.cache_hits).dim()))
            .ok();
    }
    term.write_line("").ok();

    if report.pairs.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("✓").green()))
            .ok();
    }

    for (title, kind) in [
        ("Exact Matches", MatchKind::Exact),
        ("Visual Matches", MatchKind::Visual),
        ("Similar Names", MatchKind::SimilarName),
    ] {
        let of_kind: Vec<_> = report
            .pairs
            .iter()
            .filter(|p| p.match_type == kind)
            .collect();
        if of_kind.is_empty() {
            continue;
        }

        term.write_line(&format!(
            "{}",
            style(format!("{}: {}", title, of_kind.len())).bold()
        ))
        .ok();

        for pair in of_kind.iter().take(10) {
            let detail = match pair.hash_difference {
                Some(d) => format!("{:.1}% | hash diff {}", pair.similarity_score, d),
                None => format!("{:.1}%", pair.similarity_score),
            };
            term.write_line(&format!(
                "  {} ↔ {}  {}",
                pair.file_a.name,
                pair.file_b.name,
                style(detail).dim()
            ))
            .ok();
        }
        if of_kind.len() > 10 {
            term.write_line(&format!("  ... and {} more", of_kind.len() - 10))
                .ok();
        }
        term.write_line("").ok();
    }

    if !report.warnings.is_empty() {
        term.write_line(&format!(
            "{}",
            style(format!("Warnings: {}", report.warnings.len()))
                .yellow()
                .bold()
        ))
        .ok();
        for warning in report.warnings.iter().take(10) {
            term.write_line(&format!(
                "  {} {}",
                style("!").yellow(),
                style(format!("{}: {}", warning.path.display(), warning.reason)).dim()
            ))
            .ok();
        }
        if report.warnings.len() > 10 {
            term.write_line(&format!("  ... and {} more", report.warnings.len() - 10))
                .ok();
        }
        term.write_line("").ok();
    }

    term.write_line(&format!(
        "{}",
        style("No files were modified. Review the pairs before acting on them.").dim()
    ))
    .ok();
}

fn print_json_results(report: &ScanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}

fn print_minimal_results(report: &ScanReport) {
    for pair in &report.pairs {
        println!(
            "{}\t{}",
            pair.file_a.path.display(),
            pair.file_b.path.display()
        );
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
