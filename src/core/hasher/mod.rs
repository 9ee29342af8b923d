//! # Hasher Module
//!
//! Computes content digests and perceptual fingerprints.
//!
//! ## Fingerprint Algorithms
//! - **aHash (Average Hash)** - brightness vs mean, fastest
//! - **pHash (Perceptual Hash)** - DCT-based, most robust to edits
//! - **dHash (Difference Hash)** - brightness gradients, good balance
//! - **wHash (Wavelet Hash)** - Haar wavelet approximation
//!
//! All algorithms produce fixed-length bit vectors compared by Hamming
//! distance. The content digest (blake3) lives in [`content`] and is the
//! basis for exact-duplicate certification.
//!
//! ## Example
//! ```rust,ignore
//! use image_dedup::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Average)
//!     .hash_size(8)
//!     .build();
//!
//! let hash = hasher.hash_file(&path)?;
//! ```

mod algorithms;
pub mod content;
pub mod decode;
pub mod resize;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher, WaveletHasher};
pub use content::{ContentDigest, ContentHasher};
pub use decode::ImageDecoder;
pub use traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue, PerceptualHash};

/// Default bits-per-side for the fingerprint grid (64-bit hashes)
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// Configuration builder for fingerprint hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    hash_size: u32,
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            algorithm: HashAlgorithmKind::Average,
        }
    }

    /// Set the hash size (bits per side; 8 gives 64-bit hashes)
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn HashAlgorithm> {
        match self.algorithm {
            HashAlgorithmKind::Average => Box::new(AverageHasher::new(self.hash_size)),
            HashAlgorithmKind::Perceptual => Box::new(PerceptualHasher::new(self.hash_size)),
            HashAlgorithmKind::Difference => Box::new(DifferenceHasher::new(self.hash_size)),
            HashAlgorithmKind::Wavelet => Box::new(WaveletHasher::new(self.hash_size)),
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}
