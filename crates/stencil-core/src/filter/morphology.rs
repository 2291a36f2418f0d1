//! Binary morphology with a 2x2 structuring element.
//!
//! The element `B` covers the anchor pixel plus its left, upper and upper-left
//! neighbours. Erosion takes the minimum over `B`; dilation takes the maximum
//! over the reflected element, so that a closing is extensive and leaves
//! solid shapes exactly where they were. Neighbours outside the image are
//! skipped rather than padded.
//!
//! The output is deliberately not pixel-identical to OpenCV's
//! `morphologyEx(MORPH_CLOSE)` with a 2x2 kernel. That call dilates and
//! erodes with the same anchored element, which moves every closed shape one
//! pixel down and to the right.

use image::{GrayImage, Luma};

/// Offsets of `B` relative to its anchor.
const ELEMENT: [(i64, i64); 4] = [(-1, -1), (0, -1), (-1, 0), (0, 0)];

/// Offsets of the reflected element `-B`.
const REFLECTED: [(i64, i64); 4] = [(1, 1), (0, 1), (1, 0), (0, 0)];

fn rank_filter<F>(src: &GrayImage, offsets: &[(i64, i64)], pick: F) -> GrayImage
where
    F: Fn(u8, u8) -> u8,
{
    let (width, height) = src.dimensions();
    let (w, h) = (width as i64, height as i64);
    let mut out = GrayImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let mut acc: Option<u8> = None;
            for &(dx, dy) in offsets {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let v = src.get_pixel(nx as u32, ny as u32).0[0];
                acc = Some(acc.map_or(v, |a| pick(a, v)));
            }
            // (0, 0) is in both offset sets, so acc is always populated
            out.put_pixel(x as u32, y as u32, Luma([acc.unwrap_or(0)]));
        }
    }
    out
}

/// Grow bright regions by the 2x2 element.
pub fn dilate(src: &GrayImage) -> GrayImage {
    rank_filter(src, &REFLECTED, u8::max)
}

/// Shrink bright regions by the 2x2 element.
pub fn erode(src: &GrayImage) -> GrayImage {
    rank_filter(src, &ELEMENT, u8::min)
}

/// Closing (dilation then erosion) bridges one-pixel gaps in edge strokes
/// without thickening them.
pub fn close(binary: &GrayImage) -> GrayImage {
    erode(&dilate(binary))
}

/// Flip every level: `v -> 255 - v`.
pub fn invert(src: &GrayImage) -> GrayImage {
    let mut out = src.clone();
    image::imageops::invert(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> GrayImage {
        let width = rows[0].len() as u32;
        let pixels: Vec<u8> = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| if c == '#' { 255 } else { 0 }))
            .collect();
        GrayImage::from_raw(width, rows.len() as u32, pixels).unwrap()
    }

    #[test]
    fn test_dilate_grows_up_and_left() {
        let src = grid(&[".....", ".....", "..#..", ".....", "....."]);
        let expected = grid(&[".....", ".##..", ".##..", ".....", "....."]);
        assert_eq!(dilate(&src), expected);
    }

    #[test]
    fn test_erode_undoes_dilation_of_a_dot() {
        let src = grid(&[".....", ".##..", ".##..", ".....", "....."]);
        let expected = grid(&[".....", ".....", "..#..", ".....", "....."]);
        assert_eq!(erode(&src), expected);
    }

    #[test]
    fn test_erode_ignores_outside_neighbours() {
        // Top-left pixel only sees itself
        let src = grid(&["#.", ".."]);
        assert_eq!(erode(&src).get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_close_fills_single_pixel_gap() {
        let src = grid(&[".....", ".....", "##.##", ".....", "....."]);
        let expected = grid(&[".....", ".....", "#####", ".....", "....."]);
        assert_eq!(close(&src), expected);
    }

    #[test]
    fn test_close_preserves_solid_block() {
        let src = grid(&["......", "......", "..##..", "..##..", "......", "......"]);
        assert_eq!(close(&src), src);
    }

    #[test]
    fn test_same_element_closing_shifts_block() {
        let src = grid(&["......", "......", "..##..", "..##..", "......", "......"]);
        let same_element = rank_filter(&rank_filter(&src, &ELEMENT, u8::max), &ELEMENT, u8::min);
        let shifted = grid(&["......", "......", "......", "...##.", "...##.", "......"]);

        assert_eq!(same_element, shifted);
        assert_eq!(close(&src), src);
    }

    #[test]
    fn test_close_is_extensive() {
        let src = grid(&["#..#..", ".#...#", "..##..", "#....#"]);
        let out = close(&src);
        for (a, b) in src.pixels().zip(out.pixels()) {
            assert!(b.0[0] >= a.0[0]);
        }
    }

    #[test]
    fn test_close_is_idempotent() {
        let src = grid(&["#..#..", ".#...#", "..##..", "#....#", ".#.#.#"]);
        let once = close(&src);
        assert_eq!(close(&once), once);
    }

    #[test]
    fn test_invert() {
        let src = GrayImage::from_raw(3, 1, vec![0, 255, 100]).unwrap();
        assert_eq!(invert(&src).into_raw(), vec![255, 0, 155]);
    }
}
