//! CSV export of matched pairs.
//!
//! Columns: File1_Path, File1_Name, File1_Size, File2_Path, File2_Name,
//! File2_Size, Similarity_Score, Match_Type, Hash_Difference.
//! The score carries one decimal and a percent sign; the hash-difference
//! field is empty for filename-only matches.

use crate::core::matcher::MatchPair;
use crate::error::ReportError;
use std::io::Write;
use std::path::Path;

/// Quote a field if it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write matched pairs as CSV
pub fn export_csv<W: Write>(pairs: &[MatchPair], mut writer: W) -> std::io::Result<()> {
    writeln!(
        writer,
        "File1_Path,File1_Name,File1_Size,File2_Path,File2_Name,File2_Size,\
         Similarity_Score,Match_Type,Hash_Difference"
    )?;

    for pair in pairs {
        let difference = pair
            .hash_difference
            .map(|d| d.to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{:.1}%,{},{}",
            csv_field(&pair.file_a.path.display().to_string()),
            csv_field(&pair.file_a.name),
            pair.file_a.size,
            csv_field(&pair.file_b.path.display().to_string()),
            csv_field(&pair.file_b.name),
            pair.file_b.size,
            pair.similarity_score,
            pair.match_type,
            difference
        )?;
    }

    Ok(())
}

/// Export matched pairs to a CSV file
pub fn export_to_file(pairs: &[MatchPair], path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let writer = std::io::BufWriter::new(file);
    export_csv(pairs, writer).map_err(|e| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::{MatchKind, PairFile};
    use std::path::PathBuf;

    fn pair(kind: MatchKind, score: f64, difference: Option<u32>) -> MatchPair {
        MatchPair {
            file_a: PairFile {
                path: PathBuf::from("/photos/a.jpg"),
                name: "a.jpg".to_string(),
                size: 1000,
            },
            file_b: PairFile {
                path: PathBuf::from("/photos/b.jpg"),
                name: "b.jpg".to_string(),
                size: 2000,
            },
            similarity_score: score,
            match_type: kind,
            hash_difference: difference,
        }
    }

    #[test]
    fn csv_export_includes_header() {
        let mut output = Vec::new();
        export_csv(&[pair(MatchKind::Exact, 100.0, Some(0))], &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.starts_with("File1_Path,File1_Name,File1_Size,File2_Path"));
    }

    #[test]
    fn csv_formats_score_with_one_decimal() {
        let mut output = Vec::new();
        export_csv(&[pair(MatchKind::Visual, 93.75, Some(4))], &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.contains("93.8%"));
        assert!(csv.contains(",visual,4"));
    }

    #[test]
    fn csv_leaves_difference_empty_for_name_matches() {
        let mut output = Vec::new();
        export_csv(&[pair(MatchKind::SimilarName, 90.0, None)], &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.ends_with("similar_name,"));
    }

    #[test]
    fn csv_quotes_paths_with_commas() {
        let mut record = pair(MatchKind::Exact, 100.0, Some(0));
        record.file_a.path = PathBuf::from("/photos/a, with comma.jpg");
        record.file_a.name = "a, with comma.jpg".to_string();

        let mut output = Vec::new();
        export_csv(&[record], &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.contains("\"/photos/a, with comma.jpg\""));
    }

    #[test]
    fn export_to_file_writes_all_pairs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("report.csv");

        let pairs = vec![
            pair(MatchKind::Exact, 100.0, Some(0)),
            pair(MatchKind::Visual, 95.3, Some(3)),
        ];
        export_to_file(&pairs, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3); // header + 2 rows
    }
}
