//! Wavelet Hash (wHash) implementation.
//!
//! 1. Resize the image to (hash_size * 2^levels) squared grayscale
//! 2. Run a Haar wavelet decomposition, keeping the approximation band
//!    at each level until it is hash_size x hash_size
//! 3. One bit per coefficient: 1 if above the band's median
//!
//! The median threshold makes the hash invariant to global brightness
//! shifts; the multi-level averaging absorbs compression noise.

use super::super::resize::resize_to_grayscale;
use super::super::traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::pack_bits;
use crate::error::HashError;
use image::DynamicImage;

/// Decomposition depth; 3 levels turn a 64x64 input into an 8x8 band
const LEVELS: u32 = 3;

/// Wavelet Hash (wHash) implementation
pub struct WaveletHasher {
    hash_size: u32,
}

impl WaveletHasher {
    /// Create a new wHash hasher with the given grid size
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

/// One level of 2D Haar decomposition over the top-left `size` x `size`
/// block. Only the approximation band is kept; detail coefficients are
/// never used by the hash.
fn haar_approximation_step(data: &mut [f32], stride: usize, size: usize) {
    let half = size / 2;

    // Rows: average horizontal pairs into the left half
    let mut scratch = vec![0.0f32; half];
    for y in 0..size {
        let row = y * stride;
        for x in 0..half {
            scratch[x] = (data[row + 2 * x] + data[row + 2 * x + 1]) / 2.0;
        }
        data[row..row + half].copy_from_slice(&scratch);
    }

    // Columns: average vertical pairs into the top half
    for x in 0..half {
        for y in 0..half {
            scratch[y] = (data[2 * y * stride + x] + data[(2 * y + 1) * stride + x]) / 2.0;
        }
        for y in 0..half {
            data[y * stride + x] = scratch[y];
        }
    }
}

impl HashAlgorithm for WaveletHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        let side = self.hash_size << LEVELS;
        let gray = resize_to_grayscale(image, side, side)?;

        let stride = side as usize;
        let mut coeffs: Vec<f32> = gray.pixels().map(|p| p[0] as f32 / 255.0).collect();

        let mut size = stride;
        for _ in 0..LEVELS {
            haar_approximation_step(&mut coeffs, stride, size);
            size /= 2;
        }

        let mut band = Vec::with_capacity(size * size);
        for y in 0..size {
            band.extend_from_slice(&coeffs[y * stride..y * stride + size]);
        }

        let mut sorted = band.clone();
        sorted.sort_by(f32::total_cmp);
        let median = sorted[sorted.len() / 2];

        let bits = band.iter().map(|c| *c > median).collect::<Vec<_>>();

        Ok(ImageHashValue::new(
            pack_bits(bits.into_iter()),
            HashAlgorithmKind::Wavelet,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Wavelet
    }
}
