//! Intensity scaling and global binarization.

use image::GrayImage;

use crate::Intensity;

/// Scale factor from the 0-100 intensity range onto 8-bit levels.
pub const INTENSITY_SCALE: f64 = 2.55;

/// Map an intensity to an 8-bit threshold.
///
/// The product is truncated, not rounded: intensity 50 gives 127 and 100
/// gives 254, because `2.55` is not exactly representable.
pub fn threshold_value(intensity: Intensity) -> u8 {
    (intensity.get() as f64 * INTENSITY_SCALE) as u8
}

/// Binarize: pixels strictly above `threshold` become 255, the rest 0.
pub fn binarize(edges: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = edges.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > threshold { 255 } else { 0 };
    }
    out
}
