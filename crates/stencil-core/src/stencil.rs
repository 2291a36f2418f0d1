//! The photo-to-stencil pipeline.
//!
//! ## Stage Order
//! 1. Decode (EXIF orientation applied)
//! 2. Bound the longest edge to `max_edge` (bilinear downscale)
//! 3. BT.601 luma
//! 4. CLAHE, 8x8 tiles, clip limit 2.0
//! 5. 5x5 median
//! 6. 3x3 Laplacian
//! 7. Intensity → threshold (`trunc(intensity * 2.55)`)
//! 8. Binarize (`edge > threshold`)
//! 9. 2x2 closing
//! 10. Invert, so edges end up at 0 and the background at 255
//! 11. Grayscale PNG
//!
//! Every call owns its buffers; nothing is shared or cached between calls.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::decode::{decode_image, resize_to_fit, DecodedImage};
use crate::encode::{encode_png, EncodeError};
use crate::filter::{
    binarize, close, equalize_adaptive, invert, laplacian, median_filter, threshold_value,
};
use crate::luminance::to_grayscale;
use crate::{Intensity, StencilConfig, StencilError};

/// Level of stroke pixels in the finished stencil.
pub const STROKE: u8 = 0;

/// Level of background pixels in the finished stencil.
pub const BACKGROUND: u8 = 255;

/// A finished two-level stencil, before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StencilImage {
    gray: GrayImage,
}

impl StencilImage {
    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// Row-major pixel levels, one byte per pixel.
    pub fn pixels(&self) -> &[u8] {
        self.gray.as_raw()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn into_gray(self) -> GrayImage {
        self.gray
    }

    /// Number of pixels at `level`.
    pub fn count(&self, level: u8) -> usize {
        self.pixels().iter().filter(|&&v| v == level).count()
    }

    /// Number of stroke (edge) pixels.
    pub fn stroke_count(&self) -> usize {
        self.count(STROKE)
    }

    /// True when every pixel is either 0 or 255.
    pub fn is_binary(&self) -> bool {
        self.pixels().iter().all(|&v| v == 0 || v == 255)
    }

    /// Serialize as 8-bit grayscale PNG.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        encode_png(self.pixels(), self.width(), self.height())
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StencilReport {
    /// Dimensions of the decoded upload.
    pub source_width: u32,
    pub source_height: u32,
    /// Dimensions of the stencil (after size normalization).
    pub width: u32,
    pub height: u32,
    /// 8-bit threshold derived from the intensity.
    pub threshold: u8,
    /// Stroke pixels in the finished stencil.
    pub edge_pixels: usize,
}

impl StencilReport {
    /// True when the input was shrunk to fit `max_edge`.
    pub fn downscaled(&self) -> bool {
        (self.width, self.height) != (self.source_width, self.source_height)
    }
}

/// Edge magnitude image: size normalization, luma, CLAHE, median, Laplacian.
///
/// # Errors
///
/// * `StencilError::InvalidConfig` if `config` fails validation.
/// * `StencilError::Decode` if the pixel buffer does not match the declared
///   dimensions.
pub fn edge_map(image: &DecodedImage, config: &StencilConfig) -> Result<GrayImage, StencilError> {
    config.validate()?;
    image.validate()?;

    let bounded = resize_to_fit(image, config.max_edge)?;
    let gray = to_grayscale(&bounded)?;
    let equalized = equalize_adaptive(&gray, &config.clahe);
    let denoised = median_filter(&equalized, config.median_size);
    Ok(laplacian(&denoised))
}

/// Binarized and closed edge grid with edges at 255, before inversion.
pub fn edge_mask(edges: &GrayImage, intensity: Intensity) -> GrayImage {
    close(&binarize(edges, threshold_value(intensity)))
}

/// Run stages 2-10 on an already decoded image.
pub fn render_stencil(
    image: &DecodedImage,
    intensity: Intensity,
) -> Result<StencilImage, StencilError> {
    render_stencil_with_report(image, intensity, &StencilConfig::default()).map(|(s, _)| s)
}

/// Run stages 2-10 and describe what happened.
pub fn render_stencil_with_report(
    image: &DecodedImage,
    intensity: Intensity,
    config: &StencilConfig,
) -> Result<(StencilImage, StencilReport), StencilError> {
    let edges = edge_map(image, config)?;
    let threshold = threshold_value(intensity);
    log::debug!(
        "edge map {}x{}, intensity {} -> threshold {}",
        edges.width(),
        edges.height(),
        intensity.get(),
        threshold
    );

    let stencil = StencilImage {
        gray: invert(&edge_mask(&edges, intensity)),
    };

    let report = StencilReport {
        source_width: image.width,
        source_height: image.height,
        width: stencil.width(),
        height: stencil.height(),
        threshold,
        edge_pixels: stencil.stroke_count(),
    };
    Ok((stencil, report))
}

/// Convert uploaded image bytes into PNG stencil bytes.
///
/// # Errors
///
/// * `StencilError::Decode` if the bytes are not a decodable image.
/// * `StencilError::Encode` if the stencil cannot be serialized.
pub fn transform(image_bytes: &[u8], intensity: Intensity) -> Result<Vec<u8>, StencilError> {
    transform_with_config(image_bytes, intensity, &StencilConfig::default())
}

/// [`transform`] with explicit pipeline constants.
pub fn transform_with_config(
    image_bytes: &[u8],
    intensity: Intensity,
    config: &StencilConfig,
) -> Result<Vec<u8>, StencilError> {
    config.validate()?;
    let image = decode_image(image_bytes)?;
    let (stencil, report) = render_stencil_with_report(&image, intensity, config)?;
    let png = stencil.encode()?;

    log::info!(
        "stencil {}x{} from {}x{} upload, threshold {}, {} edge pixels, {} bytes",
        report.width,
        report.height,
        report.source_width,
        report.source_height,
        report.threshold,
        report.edge_pixels,
        png.len()
    );
    Ok(png)
}


#[cfg(test)]
mod tests {
    use super::test_images::{png_bytes, portrait};
    use super::*;
    use crate::DecodeError;

    fn decode_output(png: &[u8]) -> image::DynamicImage {
        image::load_from_memory_with_format(png, image::ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_transform_is_deterministic() {
        let bytes = png_bytes(&portrait(160, 120));
        let a = transform(&bytes, Intensity::new(30)).unwrap();
        let b = transform(&bytes, Intensity::new(30)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let bytes = png_bytes(&portrait(213, 97));
        let png = transform(&bytes, Intensity::default()).unwrap();
        let out = decode_output(&png);
        assert_eq!((out.width(), out.height()), (213, 97));
    }

    #[test]
    fn test_large_landscape_is_bounded() {
        let bytes = png_bytes(&portrait(1500, 600));
        let png = transform(&bytes, Intensity::default()).unwrap();
        let out = decode_output(&png);
        assert_eq!((out.width(), out.height()), (1000, 400));
    }

    #[test]
    fn test_large_portrait_is_bounded() {
        let image = DecodedImage::from_rgb_image(portrait(700, 1201));
        let stencil = render_stencil(&image, Intensity::default()).unwrap();

        assert_eq!(stencil.height(), 1000);
        // 700 * 1000 / 1201 ≈ 582.85
        assert_eq!(stencil.width(), 583);
    }

    #[test]
    fn test_output_is_single_channel_binary() {
        let bytes = png_bytes(&portrait(120, 90));
        let png = transform(&bytes, Intensity::new(20)).unwrap();
        let out = decode_output(&png);

        assert_eq!(out.color(), image::ColorType::L8);
        assert!(out.into_luma8().pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_encoded_output_matches_grid() {
        let image = DecodedImage::from_rgb_image(portrait(90, 64));
        let stencil = render_stencil(&image, Intensity::new(15)).unwrap();
        let png = transform(&png_bytes(&portrait(90, 64)), Intensity::new(15)).unwrap();

        assert_eq!(decode_output(&png).into_luma8().as_raw(), stencil.pixels());
    }

    #[test]
    fn test_shapes_produce_strokes() {
        let image = DecodedImage::from_rgb_image(portrait(200, 150));
        let stencil = render_stencil(&image, Intensity::new(10)).unwrap();

        assert!(stencil.is_binary());
        assert!(stencil.stroke_count() > 0);
        assert!(stencil.count(BACKGROUND) > stencil.stroke_count());
    }

    #[test]
    fn test_flat_image_is_blank() {
        let image = DecodedImage::new(40, 30, vec![90u8; 40 * 30 * 3]);
        for intensity in [0, 50, 100] {
            let stencil = render_stencil(&image, Intensity::new(intensity)).unwrap();
            assert_eq!(stencil.count(BACKGROUND), 40 * 30);
        }
    }

    #[test]
    fn test_higher_intensity_never_adds_strokes() {
        let image = DecodedImage::from_rgb_image(portrait(160, 120));
        let mut last = usize::MAX;
        for intensity in (0..=100).step_by(10) {
            let stencil = render_stencil(&image, Intensity::new(intensity)).unwrap();
            assert!(stencil.stroke_count() <= last, "intensity {}", intensity);
            last = stencil.stroke_count();
        }
    }

    #[test]
    fn test_default_intensity_matches_fifty() {
        let bytes = png_bytes(&portrait(80, 80));
        assert_eq!(
            transform(&bytes, Intensity::from(None)).unwrap(),
            transform(&bytes, Intensity::new(50)).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_intensity_is_clamped() {
        let bytes = png_bytes(&portrait(64, 48));
        assert_eq!(
            transform(&bytes, Intensity::new(1000)).unwrap(),
            transform(&bytes, Intensity::new(100)).unwrap()
        );
        assert_eq!(
            transform(&bytes, Intensity::new(-5)).unwrap(),
            transform(&bytes, Intensity::new(0)).unwrap()
        );
    }

    #[test]
    fn test_invalid_bytes_fail_to_decode() {
        let result = transform(&[0x12, 0x34, 0x56, 0x78, 0x9A], Intensity::default());
        assert!(matches!(result, Err(StencilError::Decode(_))));

        let result = transform(&[], Intensity::default());
        assert!(matches!(
            result,
            Err(StencilError::Decode(DecodeError::Empty))
        ));
    }

    #[test]
    fn test_truncated_upload_fails_to_decode() {
        let bytes = png_bytes(&portrait(64, 64));
        let result = transform(&bytes[..bytes.len() / 3], Intensity::default());
        assert!(matches!(result, Err(StencilError::Decode(_))));
    }

    #[test]
    fn test_report() {
        let image = DecodedImage::from_rgb_image(portrait(1200, 300));
        let (stencil, report) =
            render_stencil_with_report(&image, Intensity::new(50), &StencilConfig::default())
                .unwrap();

        assert_eq!((report.source_width, report.source_height), (1200, 300));
        assert_eq!((report.width, report.height), (1000, 250));
        assert_eq!(report.threshold, 127);
        assert_eq!(report.edge_pixels, stencil.stroke_count());
        assert!(report.downscaled());
    }

    #[test]
    fn test_custom_config_max_edge() {
        let mut config = StencilConfig::default();
        config.max_edge = 64;
        let bytes = png_bytes(&portrait(128, 32));
        let png = transform_with_config(&bytes, Intensity::default(), &config).unwrap();
        let out = decode_output(&png);
        assert_eq!((out.width(), out.height()), (64, 16));
    }

    #[test]
    fn test_mismatched_pixel_buffer_is_rejected() {
        // Alternating black and white, one pixel and a byte short of 8x8
        let pixels: Vec<u8> = (0..187).map(|i| if (i / 3) % 2 == 0 { 0 } else { 255 }).collect();
        let image = DecodedImage::new(8, 8, pixels);

        let result = render_stencil(&image, Intensity::new(0));
        assert!(matches!(
            result,
            Err(StencilError::Decode(DecodeError::CorruptedFile(_)))
        ));
    }

    #[test]
    fn test_oversized_pixel_buffer_is_rejected_before_resize() {
        let mut pixels = portrait(1200, 40).into_raw();
        pixels.extend_from_slice(&[7, 7, 7]);
        let image = DecodedImage::new(1200, 40, pixels);

        assert!(render_stencil(&image, Intensity::default()).is_err());
    }

    #[test]
    fn test_invalid_config_is_server_error() {
        let bytes = png_bytes(&portrait(32, 32));

        let mut config = StencilConfig::default();
        config.max_edge = 0;
        let err = transform_with_config(&bytes, Intensity::default(), &config).unwrap_err();
        assert!(matches!(err, StencilError::InvalidConfig(_)));
        assert!(!err.is_client_error());

        let mut config = StencilConfig::default();
        config.clahe.tile_grid = 70_000;
        let image = DecodedImage::from_rgb_image(portrait(32, 32));
        assert!(matches!(
            render_stencil_with_report(&image, Intensity::default(), &config),
            Err(StencilError::InvalidConfig(_))
        ));

        let mut config = StencilConfig::default();
        config.median_size = u32::MAX;
        assert!(transform_with_config(&bytes, Intensity::default(), &config).is_err());
    }

    #[test]
    fn test_edge_mask_is_inverse_of_stencil() {
        let image = DecodedImage::from_rgb_image(portrait(100, 80));
        let config = StencilConfig::default();
        let intensity = Intensity::new(25);

        let mask = edge_mask(&edge_map(&image, &config).unwrap(), intensity);
        let stencil = render_stencil(&image, intensity).unwrap();

        for (m, s) in mask.as_raw().iter().zip(stencil.pixels()) {
            assert_eq!(*m, 255 - *s);
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
