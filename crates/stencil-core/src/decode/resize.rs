//! Image resizing for working-resolution normalization.
//!
//! All functions return new `DecodedImage` instances without modifying the input.
//! Resampling is bilinear (a triangle kernel).

use image::imageops::FilterType;

use super::{DecodeError, DecodedImage};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero,
/// or `DecodeError::CorruptedFile` if the source buffer does not match its
/// declared size.
pub fn resize(image: &DecodedImage, width: u32, height: u32) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    image.validate()?;

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, FilterType::Triangle);

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Shrink an image so its longest edge is at most `max_edge`, preserving
/// aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is ever upscaled.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if `max_edge` is zero. Pipeline
/// callers reject a zero `max_edge` earlier, through `StencilConfig::validate`.
pub fn resize_to_fit(image: &DecodedImage, max_edge: u32) -> Result<DecodedImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let (new_width, new_height) = calculate_fit_dimensions(image.width, image.height, max_edge);

    log::debug!(
        "downscaling {}x{} to {}x{}",
        image.width,
        image.height,
        new_width,
        new_height
    );

    resize(image, new_width, new_height)
}

/// Calculate dimensions whose longer side equals `max_edge` while preserving
/// aspect ratio. The shorter side is rounded and never drops below 1.
pub fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
