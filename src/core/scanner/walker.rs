//! Directory walking implementation using walkdir.

use super::{filter::ImageFilter, FileRecord, FileScanner, ScanOutcome, SourceSet};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
            extensions: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    fn scan_root(
        &self,
        root: &Path,
        source: SourceSet,
        events: &EventSender,
        files: &mut Vec<FileRecord>,
        errors: &mut Vec<ScanError>,
    ) {
        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let iter = walker
            .into_iter()
            // Hidden directories are pruned here; hidden files are handled
            // by the ImageFilter. Depth 0 is the root itself and always kept.
            .filter_entry(move |e| {
                include_hidden || e.depth() == 0 || !e.file_type().is_dir() || !is_hidden(e)
            });

        for entry_result in iter {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let error = if e.io_error().map(|io| io.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadFailed {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Skipped {
                        path,
                        reason: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() || !self.filter.should_include(path) {
                continue;
            }

            match fs::metadata(path) {
                Ok(metadata) => {
                    let record = FileRecord {
                        path: path.to_path_buf(),
                        size: metadata.len(),
                        modified: metadata
                            .modified()
                            .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
                        format: self.filter.format_of(path),
                        source,
                    };

                    events.send(Event::Scan(ScanEvent::FileFound {
                        path: record.path.clone(),
                    }));
                    files.push(record);
                }
                Err(e) => {
                    let error = ScanError::ReadFailed {
                        path: path.to_path_buf(),
                        source: e,
                    };

                    events.send(Event::Scan(ScanEvent::Skipped {
                        path: path.to_path_buf(),
                        reason: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }
    }
}

impl FileScanner for WalkDirScanner {
    fn scan(&self, roots: &[PathBuf]) -> ScanOutcome {
        self.scan_with_events(roots, &crate::events::null_sender())
    }

    fn scan_with_events(&self, roots: &[PathBuf], events: &EventSender) -> ScanOutcome {
        events.send(Event::Scan(ScanEvent::Started {
            roots: roots.to_vec(),
        }));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        for (index, root) in roots.iter().enumerate() {
            let source = if index == 0 {
                SourceSet::First
            } else {
                SourceSet::Second
            };

            if !root.is_dir() {
                errors.push(ScanError::DirectoryNotFound { path: root.clone() });
                continue;
            }

            self.scan_root(root, source, events, &mut files, &mut errors);
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));

        ScanOutcome { files, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let outcome = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert!(outcome.files.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn scan_finds_single_image() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "photo.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].path.ends_with("photo.jpg"));
        assert_eq!(outcome.files[0].source, SourceSet::First);
    }

    #[test]
    fn scan_excludes_unsupported_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "photo.jpg");
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        File::create(temp_dir.path().join("clip.mp4")).unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(outcome.files.len(), 1);
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        create_test_file(temp_dir.path(), "root.jpg");
        create_test_file(&subdir, "nested.png");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(outcome.files.len(), 2);
    }

    #[test]
    fn scan_excludes_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "visible.jpg");
        create_test_file(temp_dir.path(), ".hidden.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].path.ends_with("visible.jpg"));
    }

    #[test]
    fn scan_can_include_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "visible.jpg");
        create_test_file(temp_dir.path(), ".hidden.jpg");

        let config = ScanConfig {
            include_hidden: true,
            ..Default::default()
        };
        let scanner = WalkDirScanner::new(config);
        let outcome = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(outcome.files.len(), 2);
    }

    #[test]
    fn second_root_is_tagged_second() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        create_test_file(dir_a.path(), "a.jpg");
        create_test_file(dir_b.path(), "b.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()]);

        assert_eq!(outcome.files.len(), 2);
        let sources: Vec<_> = outcome.files.iter().map(|f| f.source).collect();
        assert!(sources.contains(&SourceSet::First));
        assert!(sources.contains(&SourceSet::Second));
    }

    #[test]
    fn nonexistent_root_is_recorded_as_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&[PathBuf::from("/nonexistent/path/12345")]);

        assert!(outcome.files.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }
}
