//! Content digests for exact-duplicate detection.
//!
//! Two files with equal size and equal blake3 digest are declared
//! byte-identical; the collision probability is treated as negligible.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A 256-bit blake3 digest of a file's full byte content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Restore a digest from cached bytes; `None` if the length is wrong
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Computes content digests over full file bytes
pub struct ContentHasher;

impl ContentHasher {
    /// Digest a file with buffered reads.
    ///
    /// The file handle is closed on every exit path, including read errors.
    pub fn digest_file(path: &Path) -> Result<ContentDigest, HashError> {
        let file = File::open(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = BufReader::new(file);
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ContentDigest(*hasher.finalize().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn digest_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.bin");
        fs::write(&path, b"some image bytes").unwrap();

        let first = ContentHasher::digest_file(&path).unwrap();
        let second = ContentHasher::digest_file(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn identical_content_same_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path_a = temp_dir.path().join("a.bin");
        let path_b = temp_dir.path().join("b.bin");
        fs::write(&path_a, b"identical content").unwrap();
        fs::write(&path_b, b"identical content").unwrap();

        assert_eq!(
            ContentHasher::digest_file(&path_a).unwrap(),
            ContentHasher::digest_file(&path_b).unwrap()
        );
    }

    #[test]
    fn different_content_different_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path_a = temp_dir.path().join("a.bin");
        let path_b = temp_dir.path().join("b.bin");
        fs::write(&path_a, b"content A").unwrap();
        fs::write(&path_b, b"content B").unwrap();

        assert_ne!(
            ContentHasher::digest_file(&path_a).unwrap(),
            ContentHasher::digest_file(&path_b).unwrap()
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ContentHasher::digest_file(Path::new("/nonexistent/file.jpg"));
        assert!(matches!(result, Err(HashError::IoError { .. })));
    }

    #[test]
    fn digest_round_trips_through_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.bin");
        fs::write(&path, b"round trip").unwrap();

        let digest = ContentHasher::digest_file(&path).unwrap();
        let restored = ContentDigest::from_slice(digest.as_bytes()).unwrap();

        assert_eq!(digest, restored);
        assert_eq!(digest.to_string().len(), 64);
    }
}
