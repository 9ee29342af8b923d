//! Engine implementation: configuration, validation and phase execution.

use super::{ScanReport, ScanWarning};
use crate::core::cache::{CacheBackend, CacheEntry, InMemoryCache};
use crate::core::hasher::{
    ContentDigest, ContentHasher, HashAlgorithm, HashAlgorithmKind, HasherConfig, ImageDecoder,
    ImageHashValue, PerceptualHash, DEFAULT_HASH_SIZE,
};
use crate::core::matcher::{
    aggregator, exact, filename, pair_key, visual, CandidateFile, DetectionMethod, MatchPair,
    MultiAlgorithmPolicy,
};
use crate::core::scanner::{FileScanner, ScanConfig, WalkDirScanner};
use crate::error::ConfigError;
use crate::events::{
    null_sender, CompareEvent, DigestEvent, Event, EventSender, FingerprintEvent, PhaseProgress,
    PipelineEvent, PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Default similarity threshold, percent
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 85.0;

/// Configuration for the detection engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// One root for within-directory scans, two for cross-directory
    pub roots: Vec<PathBuf>,
    /// Which detection strategies to run
    pub method: DetectionMethod,
    /// Inclusive similarity threshold for visual matches, in (0, 100]
    pub similarity_threshold: f64,
    /// Separate threshold for filename matches; falls back to
    /// `similarity_threshold` when unset
    pub filename_threshold: Option<f64>,
    /// Active fingerprint algorithms; the first one is the primary
    pub algorithms: Vec<HashAlgorithmKind>,
    /// How scores combine when several algorithms are active
    pub policy: MultiAlgorithmPolicy,
    /// Bits per side of the fingerprint grid
    pub hash_size: u32,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            method: DetectionMethod::All,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            filename_threshold: None,
            algorithms: vec![HashAlgorithmKind::Average],
            policy: MultiAlgorithmPolicy::Primary,
            hash_size: DEFAULT_HASH_SIZE,
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for the detection engine
pub struct EngineBuilder {
    config: EngineConfig,
    cache: Option<Arc<dyn CacheBackend>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            cache: None,
        }
    }

    /// Set the directory roots (one or two)
    pub fn roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.config.roots = roots;
        self
    }

    /// Set the detection method
    pub fn method(mut self, method: DetectionMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Set the visual similarity threshold
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set an independent filename similarity threshold
    pub fn filename_threshold(mut self, threshold: f64) -> Self {
        self.config.filename_threshold = Some(threshold);
        self
    }

    /// Set the active fingerprint algorithms; the first is the primary
    pub fn algorithms(mut self, algorithms: Vec<HashAlgorithmKind>) -> Self {
        self.config.algorithms = algorithms;
        self
    }

    /// Set the multi-algorithm combination policy
    pub fn policy(mut self, policy: MultiAlgorithmPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Set the fingerprint grid size
    pub fn hash_size(mut self, size: u32) -> Self {
        self.config.hash_size = size;
        self
    }

    /// Set the cache backend (shared, so callers can reuse it across runs)
    pub fn cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine {
            config: self.config,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(InMemoryCache::new())),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The duplicate detection engine
pub struct Engine {
    config: EngineConfig,
    cache: Arc<dyn CacheBackend>,
}

impl Engine {
    /// Create a new engine builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Reject invalid configuration before any scanning begins
    fn validate(&self) -> Result<(), ConfigError> {
        let count = self.config.roots.len();
        if count == 0 || count > 2 {
            return Err(ConfigError::InvalidRootCount { count });
        }

        for root in &self.config.roots {
            if !root.is_dir() {
                return Err(ConfigError::RootNotFound { path: root.clone() });
            }
        }

        let name_threshold = self
            .config
            .filename_threshold
            .unwrap_or(self.config.similarity_threshold);
        for threshold in [self.config.similarity_threshold, name_threshold] {
            if !(threshold > 0.0 && threshold <= 100.0) {
                return Err(ConfigError::InvalidThreshold { value: threshold });
            }
        }

        if self.config.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }

        Ok(())
    }

    /// Run the engine without events
    pub fn run(&self) -> crate::Result<ScanReport> {
        self.run_with_events(&null_sender())
    }

    /// Run the engine with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> crate::Result<ScanReport> {
        let start_time = Instant::now();
        self.validate()?;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: discover files
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let outcome = scanner.scan_with_events(&self.config.roots, events);

        let mut warnings: Vec<ScanWarning> = outcome
            .errors
            .iter()
            .map(|e| ScanWarning {
                path: e.path().to_path_buf(),
                reason: e.to_string(),
            })
            .collect();

        let records = outcome.files;
        let total_files = records.len();
        tracing::info!(total_files, "scan complete");

        // Phase 2: content digests (runs for every file; exact-match
        // groups gate the fingerprint early exit below)
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Digesting,
        }));
        events.send(Event::Digest(DigestEvent::Started { total_files }));

        let digest_cache_hits = AtomicUsize::new(0);
        let digests_computed = AtomicUsize::new(0);
        let digest_completed = AtomicUsize::new(0);

        let digest_results: Vec<Result<CandidateFile, ScanWarning>> = records
            .into_par_iter()
            .map(|record| {
                let completed = digest_completed.fetch_add(1, Ordering::SeqCst) + 1;
                let cached = self
                    .cache
                    .get(&record.path, record.size, record.modified)
                    .ok()
                    .flatten();

                if let Some(entry) = &cached {
                    if let Some(digest) =
                        entry.content_digest.as_deref().and_then(ContentDigest::from_slice)
                    {
                        digest_cache_hits.fetch_add(1, Ordering::SeqCst);
                        events.send(Event::Digest(DigestEvent::CacheHit {
                            path: record.path.clone(),
                        }));

                        let mut file = CandidateFile::new(record);
                        file.digest = Some(digest);
                        return Ok(file);
                    }
                }

                match ContentHasher::digest_file(&record.path) {
                    Ok(digest) => {
                        digests_computed.fetch_add(1, Ordering::SeqCst);

                        let mut entry = cached.unwrap_or_else(|| {
                            CacheEntry::new(record.path.clone(), record.size, record.modified)
                        });
                        entry.content_digest = Some(digest.as_bytes().to_vec());
                        let _ = self.cache.set(entry);

                        events.send(Event::Digest(DigestEvent::Progress(PhaseProgress {
                            completed,
                            total: total_files,
                            current_path: record.path.clone(),
                            cache_hits: digest_cache_hits.load(Ordering::SeqCst),
                        })));

                        let mut file = CandidateFile::new(record);
                        file.digest = Some(digest);
                        Ok(file)
                    }
                    Err(e) => {
                        events.send(Event::Digest(DigestEvent::Error {
                            path: record.path.clone(),
                            message: e.to_string(),
                        }));
                        Err(ScanWarning {
                            path: record.path,
                            reason: e.to_string(),
                        })
                    }
                }
            })
            .collect();

        let mut candidates = Vec::with_capacity(digest_results.len());
        for result in digest_results {
            match result {
                Ok(file) => candidates.push(file),
                Err(warning) => warnings.push(warning),
            }
        }

        events.send(Event::Digest(DigestEvent::Completed {
            digested: candidates.len(),
            cache_hits: digest_cache_hits.load(Ordering::SeqCst),
        }));

        // Exact matching; the matched set feeds the fingerprint early exit
        let cross_only = self.config.roots.len() == 2;
        let (exact_pairs, exact_matched) = if self.config.method.includes_exact() {
            exact::find_exact_matches(&candidates, cross_only)
        } else {
            (Vec::new(), HashSet::new())
        };

        // Phase 3: perceptual fingerprints for files outside exact groups
        let fingerprint_cache_hits = AtomicUsize::new(0);
        let fingerprints_computed = AtomicUsize::new(0);

        if self.config.method.includes_visual() {
            self.fingerprint_phase(
                &mut candidates,
                &exact_matched,
                events,
                &mut warnings,
                &fingerprint_cache_hits,
                &fingerprints_computed,
            );
        }

        // Phase 4: pairwise comparison
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Comparing,
        }));
        events.send(Event::Compare(CompareEvent::Started {
            total_files: candidates.len(),
        }));

        let mut matches: Vec<MatchPair> = exact_pairs;

        if self.config.method.includes_visual() {
            matches.extend(visual::find_visual_matches(
                &candidates,
                &self.config.algorithms,
                self.config.policy,
                self.config.similarity_threshold,
                cross_only,
            ));
        }

        if self.config.method.includes_names() {
            let already_matched: HashSet<_> = matches
                .iter()
                .map(|pair| pair_key(&pair.file_a.path, &pair.file_b.path))
                .collect();

            matches.extend(filename::find_name_matches(
                &candidates,
                self.config
                    .filename_threshold
                    .unwrap_or(self.config.similarity_threshold),
                cross_only,
                &already_matched,
            ));
        }

        events.send(Event::Compare(CompareEvent::Completed {
            total_matches: matches.len(),
        }));

        // Phase 5: aggregate into the final ordered result
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Aggregating,
        }));

        let pairs = aggregator::aggregate(matches);

        // Parallel phases report warnings in scheduling order; sort for
        // reproducible output
        warnings.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.reason.cmp(&b.reason)));

        let cache_hits = digest_cache_hits.load(Ordering::SeqCst)
            + fingerprint_cache_hits.load(Ordering::SeqCst);
        let duration_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            matches = pairs.len(),
            warnings = warnings.len(),
            cache_hits,
            duration_ms,
            "detection complete"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_files,
                total_matches: pairs.len(),
                warnings: warnings.len(),
                duration_ms,
            },
        }));

        Ok(ScanReport {
            pairs,
            warnings,
            total_files,
            cache_hits,
            digests_computed: digests_computed.load(Ordering::SeqCst),
            fingerprints_computed: fingerprints_computed.load(Ordering::SeqCst),
            duration_ms,
        })
    }

    /// Compute perceptual hashes for every candidate not claimed by an
    /// exact-match group. Each file is decoded once and hashed with all
    /// active algorithms; decode failures exclude the file from visual
    /// matching only.
    fn fingerprint_phase(
        &self,
        candidates: &mut [CandidateFile],
        exact_matched: &HashSet<PathBuf>,
        events: &EventSender,
        warnings: &mut Vec<ScanWarning>,
        cache_hits: &AtomicUsize,
        computed: &AtomicUsize,
    ) {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Fingerprinting,
        }));

        let total = candidates
            .iter()
            .filter(|f| !exact_matched.contains(&f.record.path))
            .count();
        events.send(Event::Fingerprint(FingerprintEvent::Started {
            total_files: total,
        }));

        let hashers: Vec<Box<dyn HashAlgorithm>> = self
            .config
            .algorithms
            .iter()
            .map(|kind| {
                HasherConfig::new()
                    .algorithm(*kind)
                    .hash_size(self.config.hash_size)
                    .build()
            })
            .collect();

        let completed_counter = AtomicUsize::new(0);

        let phase_warnings: Vec<ScanWarning> = candidates
            .par_iter_mut()
            .filter(|file| !exact_matched.contains(&file.record.path))
            .filter_map(|file| {
                let completed = completed_counter.fetch_add(1, Ordering::SeqCst) + 1;
                let cached = self
                    .cache
                    .get(&file.record.path, file.record.size, file.record.modified)
                    .ok()
                    .flatten();

                if let Some(entry) = &cached {
                    for (kind, bytes) in &entry.perceptual_hashes {
                        file.hashes
                            .insert(*kind, ImageHashValue::from_bytes(bytes, *kind));
                    }
                    if entry.has_perceptual(&self.config.algorithms) {
                        cache_hits.fetch_add(1, Ordering::SeqCst);
                        events.send(Event::Fingerprint(FingerprintEvent::CacheHit {
                            path: file.record.path.clone(),
                        }));
                        return None;
                    }
                }

                let image = match ImageDecoder::decode(&file.record.path) {
                    Ok(image) => image,
                    Err(e) => {
                        events.send(Event::Fingerprint(FingerprintEvent::Error {
                            path: file.record.path.clone(),
                            message: e.to_string(),
                        }));
                        return Some(ScanWarning {
                            path: file.record.path.clone(),
                            reason: e.to_string(),
                        });
                    }
                };

                for hasher in &hashers {
                    if file.hashes.contains_key(&hasher.kind()) {
                        continue;
                    }
                    match hasher.hash_image(&image) {
                        Ok(hash) => {
                            file.hashes.insert(hasher.kind(), hash);
                        }
                        Err(e) => {
                            events.send(Event::Fingerprint(FingerprintEvent::Error {
                                path: file.record.path.clone(),
                                message: e.to_string(),
                            }));
                            // All-or-nothing: a partial set would skew
                            // the combination policies
                            file.hashes.clear();
                            return Some(ScanWarning {
                                path: file.record.path.clone(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }

                computed.fetch_add(1, Ordering::SeqCst);

                let mut entry = cached.unwrap_or_else(|| {
                    CacheEntry::new(
                        file.record.path.clone(),
                        file.record.size,
                        file.record.modified,
                    )
                });
                if entry.content_digest.is_none() {
                    entry.content_digest = file.digest.as_ref().map(|d| d.as_bytes().to_vec());
                }
                for (kind, hash) in &file.hashes {
                    entry.perceptual_hashes.insert(*kind, hash.as_bytes().to_vec());
                }
                let _ = self.cache.set(entry);

                events.send(Event::Fingerprint(FingerprintEvent::Progress(
                    PhaseProgress {
                        completed,
                        total,
                        current_path: file.record.path.clone(),
                        cache_hits: cache_hits.load(Ordering::SeqCst),
                    },
                )));

                None
            })
            .collect();

        events.send(Event::Fingerprint(FingerprintEvent::Completed {
            fingerprinted: total - phase_warnings.len(),
            cache_hits: cache_hits.load(Ordering::SeqCst),
        }));

        warnings.extend(phase_warnings);
    }
}
