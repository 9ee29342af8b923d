//! Exact duplicate detection via (size, content digest) grouping.

use super::{sets_eligible, CandidateFile, MatchKind, MatchPair};
use crate::core::hasher::ContentDigest;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Find all byte-identical pairs.
///
/// Files are grouped by `(size, digest)`; every group of two or more
/// yields all pairwise combinations at similarity 100.0. Returns the
/// pairs plus the set of paths that belong to an exact group, which the
/// pipeline uses to skip perceptual hashing for those files.
pub fn find_exact_matches(
    files: &[CandidateFile],
    cross_only: bool,
) -> (Vec<MatchPair>, HashSet<PathBuf>) {
    let mut groups: HashMap<(u64, ContentDigest), Vec<usize>> = HashMap::new();

    for (index, file) in files.iter().enumerate() {
        if let Some(digest) = &file.digest {
            groups
                .entry((file.record.size, digest.clone()))
                .or_default()
                .push(index);
        }
    }

    let mut pairs = Vec::new();
    let mut matched = HashSet::new();

    for members in groups.values() {
        if members.len() < 2 {
            continue;
        }

        for (slot, &i) in members.iter().enumerate() {
            for &j in &members[slot + 1..] {
                let a = &files[i].record;
                let b = &files[j].record;

                if !sets_eligible(a, b, cross_only) {
                    continue;
                }

                pairs.push(MatchPair::new(a, b, 100.0, MatchKind::Exact, Some(0)));
                matched.insert(a.path.clone());
                matched.insert(b.path.clone());
            }
        }
    }

    tracing::debug!(pairs = pairs.len(), "exact matching complete");

    (pairs, matched)
}

#[cfg(test)]
mod tests {
    use super::super::tests::record;
    use super::*;
    use crate::core::scanner::SourceSet;

    fn candidate(path: &str, size: u64, content: &[u8], source: SourceSet) -> CandidateFile {
        let mut file = CandidateFile::new(record(path, size, source));
        file.digest = ContentDigest::from_slice(blake3::hash(content).as_bytes());
        file
    }

    #[test]
    fn identical_content_forms_a_pair() {
        let files = vec![
            candidate("/a.jpg", 100, b"same", SourceSet::First),
            candidate("/b.jpg", 100, b"same", SourceSet::First),
        ];

        let (pairs, matched) = find_exact_matches(&files, false);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].similarity_score, 100.0);
        assert_eq!(pairs[0].match_type, MatchKind::Exact);
        assert_eq!(pairs[0].hash_difference, Some(0));
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn different_content_does_not_match() {
        let files = vec![
            candidate("/a.jpg", 100, b"one", SourceSet::First),
            candidate("/b.jpg", 100, b"two", SourceSet::First),
        ];

        let (pairs, matched) = find_exact_matches(&files, false);

        assert!(pairs.is_empty());
        assert!(matched.is_empty());
    }

    #[test]
    fn same_digest_different_size_does_not_match() {
        // Size is part of the group key even though equal digests with
        // unequal sizes should never happen in practice
        let files = vec![
            candidate("/a.jpg", 100, b"same", SourceSet::First),
            candidate("/b.jpg", 200, b"same", SourceSet::First),
        ];

        let (pairs, _) = find_exact_matches(&files, false);
        assert!(pairs.is_empty());
    }

    #[test]
    fn group_of_three_yields_three_pairs() {
        let files = vec![
            candidate("/a.jpg", 100, b"same", SourceSet::First),
            candidate("/b.jpg", 100, b"same", SourceSet::First),
            candidate("/c.jpg", 100, b"same", SourceSet::First),
        ];

        let (pairs, matched) = find_exact_matches(&files, false);

        assert_eq!(pairs.len(), 3);
        assert_eq!(matched.len(), 3);
    }

    #[test]
    fn files_without_digest_are_skipped() {
        let mut no_digest = CandidateFile::new(record("/a.jpg", 100, SourceSet::First));
        no_digest.digest = None;
        let files = vec![
            no_digest,
            candidate("/b.jpg", 100, b"same", SourceSet::First),
        ];

        let (pairs, _) = find_exact_matches(&files, false);
        assert!(pairs.is_empty());
    }

    #[test]
    fn cross_only_suppresses_within_set_pairs() {
        let files = vec![
            candidate("/one/a.jpg", 100, b"same", SourceSet::First),
            candidate("/one/b.jpg", 100, b"same", SourceSet::First),
            candidate("/two/c.jpg", 100, b"same", SourceSet::Second),
        ];

        let (pairs, _) = find_exact_matches(&files, true);

        // a-c and b-c cross the sets; a-b does not
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| {
            p.file_a.path.starts_with("/one") != p.file_b.path.starts_with("/one")
        }));
    }
}
