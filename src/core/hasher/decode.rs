//! Image decoding with a fast path for JPEGs.
//!
//! JPEG files go through zune-jpeg (1.5-2x faster than the image crate);
//! everything else, and any JPEG that zune refuses, falls back to
//! `image::open`.

use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decodes image files into memory for hashing
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode an image from a file path using the fastest available decoder.
    pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
        let is_jpeg = matches!(
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .as_deref(),
            Some("jpg" | "jpeg")
        );

        let image = if is_jpeg {
            Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))?
        } else {
            Self::decode_fallback(path)?
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(image)
    }

    /// Fast JPEG decoding via zune-jpeg, forced to RGB output
    fn decode_jpeg(path: &Path) -> Result<DynamicImage, HashError> {
        let file_bytes = fs::read(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: "missing image info after decode".to_string(),
        })?;

        if decoder.get_output_colorspace() != Some(ColorSpace::RGB) {
            // Unexpected colorspace; let the image crate sort it out
            return Self::decode_fallback(path);
        }

        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(info.width as u32, info.height as u32, pixels).ok_or_else(
                || HashError::DecodeError {
                    path: path.to_path_buf(),
                    reason: "pixel buffer does not match reported dimensions".to_string(),
                },
            )?;

        Ok(DynamicImage::ImageRgb8(buffer))
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, HashError> {
        image::open(path).map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
