//! Grayscale PNG encoding for the finished stencil.
//!
//! PNG keeps the two levels exact, which a lossy format would not: decoding
//! the output gives back precisely the grid that was encoded.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

/// The eight magic bytes every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode single-channel 8-bit pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - Luma pixel data (1 byte per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
///
/// PNG-encoded bytes on success, or an error if encoding fails.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize);
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::L8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_luma(bytes: &[u8]) -> image::GrayImage {
        image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .unwrap()
            .into_luma8()
    }

    #[test]
    fn test_encode_png_signature() {
        let pixels = vec![255u8; 20 * 10];
        let png = encode_png(&pixels, 20, 10).unwrap();

        assert_eq!(&png[..8], &PNG_SIGNATURE);
        // IEND chunk type sits 8 bytes before the end (type + CRC)
        let len = png.len();
        assert_eq!(&png[len - 8..len - 4], b"IEND");
    }

    #[test]
    fn test_encode_png_is_grayscale() {
        let pixels = vec![0u8; 4 * 4];
        let png = encode_png(&pixels, 4, 4).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let pixels: Vec<u8> = (0..64u32).map(|i| if i % 3 == 0 { 255 } else { 0 }).collect();
        let png = encode_png(&pixels, 8, 8).unwrap();

        let decoded = decode_luma(&png);
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data() {
        let short = vec![0u8; 99];
        assert!(matches!(
            encode_png(&short, 10, 10),
            Err(EncodeError::InvalidPixelData {
                expected: 100,
                actual: 99
            })
        ));

        let long = vec![0u8; 101];
        assert!(matches!(
            encode_png(&long, 10, 10),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_encode_png_zero_dimensions() {
        assert!(matches!(
            encode_png(&[], 0, 10),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_png(&[], 10, 0),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::InvalidDimensions {
            width: 0,
            height: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (3) must be non-zero"
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
