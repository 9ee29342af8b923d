//! Filename similarity detection via normalized edit distance.
//!
//! Filenames are compared as extension-stripped stems. The similarity is
//! `100 * (1 - levenshtein(a, b) / max(len(a), len(b)))`, character-based
//! so multi-byte names are measured correctly.

use super::{pair_key, sets_eligible, CandidateFile, MatchKind, MatchPair};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

/// Levenshtein edit distance with the two-row dynamic program.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = insertion.min(deletion).min(substitution);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Normalized name similarity in [0, 100]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }
    (1.0 - levenshtein(a, b) as f64 / max_len as f64) * 100.0
}

/// Find pairs whose stems are within the edit-distance threshold.
///
/// Pairs already claimed by the exact or visual matchers are skipped;
/// `already_matched` carries their unordered keys.
pub fn find_name_matches(
    files: &[CandidateFile],
    threshold: f64,
    cross_only: bool,
    already_matched: &HashSet<(PathBuf, PathBuf)>,
) -> Vec<MatchPair> {
    let pairs: Vec<MatchPair> = (0..files.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            ((i + 1)..files.len()).filter_map(move |j| {
                let a = &files[i].record;
                let b = &files[j].record;

                if !sets_eligible(a, b, cross_only) {
                    return None;
                }
                if already_matched.contains(&pair_key(&a.path, &b.path)) {
                    return None;
                }

                let score = name_similarity(a.stem(), b.stem());
                (score >= threshold)
                    .then(|| MatchPair::new(a, b, score, MatchKind::SimilarName, None))
            })
        })
        .collect();

    tracing::debug!(pairs = pairs.len(), "filename matching complete");

    pairs
}

#[cfg(test)]
mod tests {
    use super::super::tests::record;
    use super::*;
    use crate::core::scanner::SourceSet;
    use std::path::Path;

    fn candidate(path: &str) -> CandidateFile {
        CandidateFile::new(record(path, 100, SourceSet::First))
    }

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn levenshtein_is_symmetric() {
        assert_eq!(
            levenshtein("vacation_beach", "vacation_beach_copy"),
            levenshtein("vacation_beach_copy", "vacation_beach")
        );
    }

    #[test]
    fn name_similarity_normalizes_by_longer_name() {
        // distance 5, max length 19: 100 * (1 - 5/19)
        let score = name_similarity("vacation_beach", "vacation_beach_copy");
        assert!((score - 100.0 * (1.0 - 5.0 / 19.0)).abs() < 1e-9);
    }

    #[test]
    fn identical_names_score_100() {
        assert_eq!(name_similarity("holiday", "holiday"), 100.0);
        assert_eq!(name_similarity("", ""), 100.0);
    }

    #[test]
    fn matcher_compares_stems_not_extensions() {
        let files = vec![candidate("/a/photo.jpg"), candidate("/b/photo.png")];

        let pairs = find_name_matches(&files, 100.0, false, &HashSet::new());

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].match_type, MatchKind::SimilarName);
        assert_eq!(pairs[0].hash_difference, None);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        // "abcd" vs "abce": distance 1, max 4 -> 75.0
        let files = vec![candidate("/x/abcd.jpg"), candidate("/x/abce.jpg")];

        assert_eq!(
            find_name_matches(&files, 75.0, false, &HashSet::new()).len(),
            1
        );
        assert!(find_name_matches(&files, 75.1, false, &HashSet::new()).is_empty());
    }

    #[test]
    fn already_matched_pairs_are_skipped() {
        let files = vec![candidate("/x/photo.jpg"), candidate("/x/photo.png")];
        let mut matched = HashSet::new();
        matched.insert(pair_key(
            Path::new("/x/photo.jpg"),
            Path::new("/x/photo.png"),
        ));

        assert!(find_name_matches(&files, 50.0, false, &matched).is_empty());
    }

    #[test]
    fn dissimilar_names_do_not_match() {
        let files = vec![candidate("/x/sunset.jpg"), candidate("/x/invoice_2024.jpg")];

        assert!(find_name_matches(&files, 85.0, false, &HashSet::new()).is_empty());
    }
}
