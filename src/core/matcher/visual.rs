//! Visual similarity detection via perceptual fingerprint comparison.
//!
//! The O(k²) pair space is the dominant cost of a scan, so the index
//! space is partitioned across rayon workers. Each worker reads the
//! shared candidate arena and produces its own output buffer; rayon
//! merges them at collect time. No locks are held in the hot loop.

use super::{sets_eligible, CandidateFile, MatchKind, MatchPair, MultiAlgorithmPolicy};
use crate::core::hasher::{HashAlgorithmKind, PerceptualHash};
use rayon::prelude::*;

/// Compare one pair under the configured algorithms and policy.
///
/// Returns `(similarity, bit_distance)` or `None` when either file lacks
/// the required fingerprints (decode failure or exact-match early exit).
fn compare_pair(
    a: &CandidateFile,
    b: &CandidateFile,
    algorithms: &[HashAlgorithmKind],
    policy: MultiAlgorithmPolicy,
) -> Option<(f64, u32)> {
    let mut scores: Vec<(f64, u32)> = Vec::with_capacity(algorithms.len());

    for kind in algorithms {
        let (hash_a, hash_b) = match (a.hashes.get(kind), b.hashes.get(kind)) {
            (Some(x), Some(y)) => (x, y),
            _ => return None,
        };
        scores.push((hash_a.similarity(hash_b), hash_a.distance(hash_b)));
    }

    match policy {
        // The first configured algorithm is the primary one
        MultiAlgorithmPolicy::Primary => scores.first().copied(),
        MultiAlgorithmPolicy::Any => scores.into_iter().max_by(|x, y| x.0.total_cmp(&y.0)),
        MultiAlgorithmPolicy::All => scores.into_iter().min_by(|x, y| x.0.total_cmp(&y.0)),
    }
}

/// Find all visually similar pairs at or above the threshold.
///
/// The threshold boundary is inclusive: a pair scoring exactly the
/// threshold is retained.
pub fn find_visual_matches(
    files: &[CandidateFile],
    algorithms: &[HashAlgorithmKind],
    policy: MultiAlgorithmPolicy,
    threshold: f64,
    cross_only: bool,
) -> Vec<MatchPair> {
    let pairs: Vec<MatchPair> = (0..files.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            ((i + 1)..files.len()).filter_map(move |j| {
                let a = &files[i];
                let b = &files[j];

                if !sets_eligible(&a.record, &b.record, cross_only) {
                    return None;
                }

                let (score, distance) = compare_pair(a, b, algorithms, policy)?;
                (score >= threshold).then(|| {
                    MatchPair::new(
                        &a.record,
                        &b.record,
                        score,
                        MatchKind::Visual,
                        Some(distance),
                    )
                })
            })
        })
        .collect();

    tracing::debug!(pairs = pairs.len(), "visual matching complete");

    pairs
}
