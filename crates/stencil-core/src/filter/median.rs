//! Rank-based denoising.

use image::GrayImage;

use crate::StencilConfig;

/// Replace every pixel with the median of its `size x size` neighbourhood.
///
/// `size` must be odd; even sizes are rounded up to the next odd window.
/// Sizes above `StencilConfig::MAX_MEDIAN_SIZE` are capped.
/// Pixels beyond the border take the value of the nearest edge pixel.
pub fn median_filter(gray: &GrayImage, size: u32) -> GrayImage {
    let radius = size.min(StencilConfig::MAX_MEDIAN_SIZE) / 2;
    if radius == 0 || gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    imageproc::filter::median_filter(gray, radius, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_removes_isolated_speckle() {
        let mut gray = GrayImage::from_pixel(9, 9, Luma([40]));
        gray.put_pixel(4, 4, Luma([255]));
        gray.put_pixel(1, 7, Luma([0]));

        let out = median_filter(&gray, 5);
        assert!(out.pixels().all(|p| p.0[0] == 40));
    }

    #[test]
    fn test_preserves_step_edge() {
        // Left half dark, right half bright
        let gray = GrayImage::from_fn(12, 12, |x, _| Luma([if x < 6 { 20 } else { 220 }]));
        let out = median_filter(&gray, 5);

        assert_eq!(out, gray);
    }

    #[test]
    fn test_size_one_is_identity() {
        let gray = GrayImage::from_fn(5, 3, |x, y| Luma([(x * 10 + y) as u8]));
        assert_eq!(median_filter(&gray, 1), gray);
    }

    #[test]
    fn test_huge_size_is_capped() {
        let gray = GrayImage::from_pixel(6, 4, Luma([33]));
        assert_eq!(median_filter(&gray, u32::MAX), gray);
    }

    #[test]
    fn test_dimensions_preserved() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([(x + y) as u8]));
        assert_eq!(median_filter(&gray, 5).dimensions(), (3, 2));
    }
}
