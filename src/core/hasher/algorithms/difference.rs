//! Difference Hash (dHash) implementation.
//!
//! 1. Resize the image to (hash_size+1) x hash_size grayscale
//! 2. Compare each pixel to its right neighbor
//! 3. One bit per comparison: 1 if the left pixel is brighter
//!
//! Captures the horizontal brightness gradient, which survives
//! re-encoding and resizing well.

use super::super::resize::resize_to_grayscale;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::pack_bits;
use crate::error::HashError;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
pub struct DifferenceHasher {
    hash_size: u32,
}

impl DifferenceHasher {
    /// Create a new dHash hasher with the given grid size
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        // One extra column so every grid cell has a right neighbor
        let gray = resize_to_grayscale(image, self.hash_size + 1, self.hash_size)?;

        let mut bits = Vec::with_capacity((self.hash_size * self.hash_size) as usize);
        for y in 0..self.hash_size {
            for x in 0..self.hash_size {
                let left = gray.get_pixel(x, y)[0];
                let right = gray.get_pixel(x + 1, y)[0];
                bits.push(left > right);
            }
        }

        Ok(ImageHashValue::new(
            pack_bits(bits.into_iter()),
            HashAlgorithmKind::Difference,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}
