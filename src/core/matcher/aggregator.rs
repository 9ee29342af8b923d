//! Merges matcher outputs into one deduplicated, ordered result.

use super::MatchPair;
use std::collections::HashMap;
use std::path::PathBuf;

/// Merge match lists into a single deterministic sequence.
///
/// When several strategies claim the same unordered pair, only the
/// highest-priority record survives (exact > visual > similar_name).
/// The result is sorted by descending similarity, ties broken by method
/// priority, then by path, so repeated runs produce identical output
/// regardless of worker scheduling.
pub fn aggregate(matches: Vec<MatchPair>) -> Vec<MatchPair> {
    let mut best: HashMap<(PathBuf, PathBuf), MatchPair> = HashMap::new();

    for pair in matches {
        match best.get(&pair.key()) {
            Some(existing) if existing.match_type.priority() >= pair.match_type.priority() => {}
            _ => {
                best.insert(pair.key(), pair);
            }
        }
    }

    let mut result: Vec<MatchPair> = best.into_values().collect();
    result.sort_by(|a, b| {
        b.similarity_score
            .total_cmp(&a.similarity_score)
            .then_with(|| b.match_type.priority().cmp(&a.match_type.priority()))
            .then_with(|| a.file_a.path.cmp(&b.file_a.path))
            .then_with(|| a.file_b.path.cmp(&b.file_b.path))
    });

    result
}

#[cfg(test)]
mod tests {
    use super::super::tests::record;
    use super::super::{MatchKind, MatchPair};
    use super::*;
    use crate::core::scanner::SourceSet;

    fn pair(a: &str, b: &str, score: f64, kind: MatchKind) -> MatchPair {
        let diff = match kind {
            MatchKind::Exact => Some(0),
            MatchKind::Visual => Some(4),
            MatchKind::SimilarName => None,
        };
        MatchPair::new(
            &record(a, 100, SourceSet::First),
            &record(b, 100, SourceSet::First),
            score,
            kind,
            diff,
        )
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn overlapping_pair_keeps_highest_priority() {
        let merged = aggregate(vec![
            pair("/a.jpg", "/b.jpg", 95.0, MatchKind::Visual),
            pair("/a.jpg", "/b.jpg", 100.0, MatchKind::Exact),
            pair("/a.jpg", "/b.jpg", 90.0, MatchKind::SimilarName),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].match_type, MatchKind::Exact);
    }

    #[test]
    fn priority_wins_regardless_of_insertion_order() {
        let merged = aggregate(vec![
            pair("/a.jpg", "/b.jpg", 100.0, MatchKind::Exact),
            pair("/a.jpg", "/b.jpg", 95.0, MatchKind::Visual),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].match_type, MatchKind::Exact);
    }

    #[test]
    fn swapped_sides_count_as_the_same_pair() {
        let merged = aggregate(vec![
            pair("/a.jpg", "/b.jpg", 95.0, MatchKind::Visual),
            pair("/b.jpg", "/a.jpg", 90.0, MatchKind::SimilarName),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].match_type, MatchKind::Visual);
    }

    #[test]
    fn sorted_by_descending_score() {
        let merged = aggregate(vec![
            pair("/a.jpg", "/b.jpg", 90.0, MatchKind::Visual),
            pair("/c.jpg", "/d.jpg", 100.0, MatchKind::Exact),
            pair("/e.jpg", "/f.jpg", 95.0, MatchKind::Visual),
        ]);

        let scores: Vec<f64> = merged.iter().map(|p| p.similarity_score).collect();
        assert_eq!(scores, vec![100.0, 95.0, 90.0]);
    }

    #[test]
    fn score_ties_break_by_method_priority_then_path() {
        let merged = aggregate(vec![
            pair("/b.jpg", "/z.jpg", 100.0, MatchKind::SimilarName),
            pair("/c.jpg", "/z.jpg", 100.0, MatchKind::Exact),
            pair("/a.jpg", "/z.jpg", 100.0, MatchKind::Exact),
        ]);

        assert_eq!(merged[0].match_type, MatchKind::Exact);
        assert!(merged[0].file_a.path.ends_with("a.jpg"));
        assert_eq!(merged[1].match_type, MatchKind::Exact);
        assert_eq!(merged[2].match_type, MatchKind::SimilarName);
    }

    #[test]
    fn no_duplicate_unordered_pairs_in_output() {
        let merged = aggregate(vec![
            pair("/a.jpg", "/b.jpg", 95.0, MatchKind::Visual),
            pair("/b.jpg", "/a.jpg", 95.0, MatchKind::Visual),
            pair("/a.jpg", "/c.jpg", 95.0, MatchKind::Visual),
        ]);

        assert_eq!(merged.len(), 2);
        let keys: Vec<_> = merged.iter().map(|p| p.key()).collect();
        let unique: std::collections::HashSet<_> = keys.iter().cloned().collect();
        assert_eq!(keys.len(), unique.len());
    }
}
