//! SIMD-accelerated resize-to-grayscale for the hand-rolled hashers.
//!
//! Uses fast_image_resize (5-14x faster than the image crate's resize;
//! AVX2/NEON when available).

use crate::error::HashError;
use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// Resize an image to the given dimensions and convert to grayscale.
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    // Grayscale first: resizing one channel is cheaper than three
    let gray = image.to_luma8();

    let src_width = gray.width();
    let src_height = gray.height();

    if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
        return Err(HashError::ComputationFailed(format!(
            "invalid resize dimensions {}x{} -> {}x{}",
            src_width, src_height, width, height
        )));
    }

    let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
        .map_err(|e| HashError::ComputationFailed(format!("resize source setup failed: {}", e)))?;

    let mut dst_image = Image::new(width, height, PixelType::U8);

    // Bilinear is enough for hashing; the downsample dominates anyway
    let options = ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| HashError::ComputationFailed(format!("resize failed: {}", e)))?;

    let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            HashError::ComputationFailed("resized buffer has unexpected length".to_string())
        })?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Rgb([r, g, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let image = create_test_image(100, 80);
        let resized = resize_to_grayscale(&image, 9, 8).unwrap();

        assert_eq!(resized.width(), 9);
        assert_eq!(resized.height(), 8);
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let image = create_test_image(10, 10);
        assert!(resize_to_grayscale(&image, 0, 8).is_err());
    }

    #[test]
    fn upscale_also_works() {
        let image = create_test_image(4, 4);
        let resized = resize_to_grayscale(&image, 16, 16).unwrap();
        assert_eq!(resized.width(), 16);
    }
}
