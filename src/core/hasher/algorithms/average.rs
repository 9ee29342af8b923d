//! Average Hash (aHash) implementation.
//!
//! 1. Resize the image to hash_size x hash_size grayscale
//! 2. Compute the mean brightness
//! 3. One bit per pixel: 1 if brighter than the mean, else 0

use super::super::resize::resize_to_grayscale;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::pack_bits;
use crate::error::HashError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher with the given grid size
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        let gray = resize_to_grayscale(image, self.hash_size, self.hash_size)?;

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let count = (self.hash_size * self.hash_size) as u64;
        let average = (total / count) as u8;

        let bits = gray.pixels().map(|p| p[0] > average).collect::<Vec<_>>();

        Ok(ImageHashValue::new(
            pack_bits(bits.into_iter()),
            HashAlgorithmKind::Average,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
