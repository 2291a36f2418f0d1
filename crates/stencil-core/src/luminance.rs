//! Luminance calculation using ITU-R BT.601 coefficients.
//!
//! The stencil pipeline works on a single luma channel. Weights are the
//! classic BT.601 ones (`0.299 R + 0.587 G + 0.114 B`) evaluated in 14-bit
//! fixed point, which keeps the conversion exact for neutral grays and
//! independent of float rounding across targets.

use image::GrayImage;

use crate::decode::{DecodeError, DecodedImage};

// 0.299, 0.587 and 0.114 scaled by 2^14
const FIXED_SHIFT: u32 = 14;
const FIXED_R: u32 = 4899;
const FIXED_G: u32 = 9617;
const FIXED_B: u32 = 1868;
const FIXED_HALF: u32 = 1 << (FIXED_SHIFT - 1);

/// Calculate luminance from u8 RGB values using fixed-point weights.
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let sum = FIXED_R * r as u32 + FIXED_G * g as u32 + FIXED_B * b as u32 + FIXED_HALF;
    // Weights sum to 1 << FIXED_SHIFT, so the shifted value never exceeds 255
    (sum >> FIXED_SHIFT) as u8
}

/// Convert an RGB image to a single-channel luma image.
///
/// # Errors
///
/// Fails through [`DecodedImage::validate`] when the buffer does not hold
/// exactly `width * height` RGB pixels.
pub fn to_grayscale(image: &DecodedImage) -> Result<GrayImage, DecodeError> {
    image.validate()?;

    let mut gray = GrayImage::new(image.width, image.height);
    for (dst, px) in gray.iter_mut().zip(image.pixels.chunks_exact(3)) {
        *dst = calculate_luminance_u8(px[0], px[1], px[2]);
    }
    Ok(gray)
}
