//! Trait definitions for perceptual hashing.

use super::decode::ImageDecoder;
use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the raw hash bytes
    fn as_bytes(&self) -> &[u8];

    /// Get the hash as a hexadecimal string
    fn to_hex(&self) -> String {
        self.as_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32 {
        (self.as_bytes().len() * 8) as u32
    }

    /// Calculate similarity as a percentage in [0, 100].
    ///
    /// Linear in the bit-distance: `100 * (1 - distance / bits)`, so a
    /// 64-bit hash at distance 4 scores 93.75.
    fn similarity(&self, other: &Self) -> f64 {
        let distance = self.distance(other);
        let max_distance = self.bit_count();
        if max_distance == 0 {
            return 100.0;
        }
        (1.0 - (distance as f64 / max_distance as f64)) * 100.0
    }
}

/// Available perceptual hash algorithms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - brightness vs mean, fastest
    Average,
    /// Perceptual Hash (pHash) - DCT frequency structure, most robust
    Perceptual,
    /// Difference Hash (dHash) - horizontal brightness gradients
    Difference,
    /// Wavelet Hash (wHash) - Haar wavelet approximation coefficients
    Wavelet,
}

impl HashAlgorithmKind {
    /// Stable lowercase name, used for cache storage
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => "average",
            HashAlgorithmKind::Perceptual => "perceptual",
            HashAlgorithmKind::Difference => "difference",
            HashAlgorithmKind::Wavelet => "wavelet",
        }
    }

    /// Parse a stored name back into a kind
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "average" => Some(HashAlgorithmKind::Average),
            "perceptual" => Some(HashAlgorithmKind::Perceptual),
            "difference" => Some(HashAlgorithmKind::Difference),
            "wavelet" => Some(HashAlgorithmKind::Wavelet),
            _ => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Wavelet => write!(f, "wHash"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError>;

    /// Compute a hash directly from a file path
    fn hash_file(&self, path: &Path) -> Result<ImageHashValue, HashError> {
        let image = ImageDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// Concrete hash value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHashValue {
    bytes: Vec<u8>,
    algorithm: HashAlgorithmKind,
}

impl ImageHashValue {
    /// Create a new hash value
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Create from raw bytes (for cache restoration)
    pub fn from_bytes(bytes: &[u8], algorithm: HashAlgorithmKind) -> Self {
        Self {
            bytes: bytes.to_vec(),
            algorithm,
        }
    }

    /// Get the algorithm that produced this hash
    pub fn algorithm(&self) -> HashAlgorithmKind {
        self.algorithm
    }
}

impl PerceptualHash for ImageHashValue {
    fn distance(&self, other: &Self) -> u32 {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_hash(bytes: &[u8]) -> ImageHashValue {
        ImageHashValue::new(bytes.to_vec(), HashAlgorithmKind::Average)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let hash = create_test_hash(&[0xFF, 0x00, 0xAA, 0x55]);
        assert_eq!(hash.distance(&hash), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let hash_a = create_test_hash(&[0xFF, 0x00]);
        let hash_b = create_test_hash(&[0x0F, 0xF0]);

        assert_eq!(hash_a.distance(&hash_b), hash_b.distance(&hash_a));
    }

    #[test]
    fn distance_counts_differing_bits() {
        let hash_a = create_test_hash(&[0b1111_1111]);
        let hash_b = create_test_hash(&[0b0000_0000]);

        assert_eq!(hash_a.distance(&hash_b), 8);
    }

    #[test]
    fn similarity_is_linear_in_distance() {
        // 64-bit hash at distance 4 scores 100 * (1 - 4/64) = 93.75
        let hash_a = create_test_hash(&[0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let hash_b = create_test_hash(&[0x00; 8]);

        assert_eq!(hash_a.distance(&hash_b), 4);
        assert_eq!(hash_a.similarity(&hash_b), 93.75);
    }

    #[test]
    fn similarity_is_100_for_identical() {
        let hash = create_test_hash(&[0xFF, 0x00]);
        assert_eq!(hash.similarity(&hash), 100.0);
    }

    #[test]
    fn similarity_is_0_for_opposite() {
        let hash_a = create_test_hash(&[0xFF]);
        let hash_b = create_test_hash(&[0x00]);

        assert_eq!(hash_a.similarity(&hash_b), 0.0);
    }

    #[test]
    fn to_hex_produces_correct_string() {
        let hash = create_test_hash(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(hash.to_hex(), "deadbeef");
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            HashAlgorithmKind::Average,
            HashAlgorithmKind::Perceptual,
            HashAlgorithmKind::Difference,
            HashAlgorithmKind::Wavelet,
        ] {
            assert_eq!(HashAlgorithmKind::from_str_opt(kind.as_str()), Some(kind));
        }
        assert_eq!(HashAlgorithmKind::from_str_opt("md5"), None);
    }
}
