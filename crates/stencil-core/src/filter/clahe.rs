//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The image is split into a `tile_grid x tile_grid` grid. Each tile gets its
//! own equalization LUT built from a clipped histogram, and every output pixel
//! blends the LUTs of the four nearest tile centres bilinearly. Clipping stops
//! flat regions (skin, sky, walls) from having sensor noise blown up into
//! texture that the edge detector would later trace.
//!
//! ## Tiling
//!
//! When the image dimensions are not both multiples of the grid, histograms
//! are collected over a virtually padded image (reflect-101 borders) whose
//! dimensions are rounded up, so all tiles have the same area. Note that the
//! padding is applied on both axes in that case, even if one axis was already
//! a multiple of the grid.

use image::GrayImage;

use super::reflect_101;
use crate::histogram::{TileHistogram, BINS};
use crate::ClaheParams;

/// Apply CLAHE to a luma image.
///
/// # Arguments
/// * `gray` - Single-channel source image
/// * `params` - Clip limit and tile grid size (see [`ClaheParams`])
///
/// # Returns
/// A new image with the same dimensions as `gray`.
pub fn equalize_adaptive(gray: &GrayImage, params: &ClaheParams) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let tiles = params.tile_grid.clamp(1, ClaheParams::MAX_TILE_GRID);
    let (ext_width, ext_height) = padded_dimensions(width, height, tiles);
    let tile_width = ext_width / tiles;
    let tile_height = ext_height / tiles;
    let area = tile_width * tile_height;
    let limit = clip_limit_counts(params.clip_limit, area);

    let luts = build_tile_luts(gray, tiles, tile_width, tile_height, limit);
    interpolate(gray, &luts, tiles, tile_width, tile_height)
}

/// Dimensions of the virtual image histograms are collected over.
pub fn padded_dimensions(width: u32, height: u32, tiles: u32) -> (u32, u32) {
    if width % tiles == 0 && height % tiles == 0 {
        (width, height)
    } else {
        (
            width + tiles - width % tiles,
            height + tiles - height % tiles,
        )
    }
}

/// Convert the relative clip limit into a per-bin count for a tile of `area`
/// pixels. Returns `None` when clipping is disabled (`clip_limit <= 0`).
pub fn clip_limit_counts(clip_limit: f64, area: u32) -> Option<u32> {
    if clip_limit > 0.0 {
        let counts = (clip_limit * area as f64 / BINS as f64) as u32;
        Some(counts.max(1))
    } else {
        None
    }
}

fn build_tile_luts(
    gray: &GrayImage,
    tiles: u32,
    tile_width: u32,
    tile_height: u32,
    limit: Option<u32>,
) -> Vec<[u8; BINS]> {
    let (width, height) = gray.dimensions();
    let src = gray.as_raw();
    let area = tile_width * tile_height;

    let mut luts = Vec::with_capacity((tiles * tiles) as usize);
    for ty in 0..tiles {
        for tx in 0..tiles {
            let samples = (ty * tile_height..(ty + 1) * tile_height).flat_map(|y| {
                let row = reflect_101(y as i64, height as usize) * width as usize;
                (tx * tile_width..(tx + 1) * tile_width)
                    .map(move |x| src[row + reflect_101(x as i64, width as usize)])
            });
            let mut hist = TileHistogram::from_values(samples);

            if let Some(limit) = limit {
                hist.clip_and_redistribute(limit);
            }
            luts.push(hist.equalization_lut(area));
        }
    }
    luts
}

/// Neighbouring tile indices and the weight of the second one along one axis.
#[derive(Debug, Clone, Copy)]
struct AxisBlend {
    first: usize,
    second: usize,
    weight: f32,
}

fn axis_blends(len: u32, tile_len: u32, tiles: u32) -> Vec<AxisBlend> {
    let inv = 1.0f32 / tile_len as f32;
    (0..len)
        .map(|p| {
            let pos = p as f32 * inv - 0.5;
            let lower = pos.floor();
            let weight = pos - lower;
            let lower = lower as i64;
            AxisBlend {
                first: lower.max(0) as usize,
                second: (lower + 1).min(tiles as i64 - 1) as usize,
                weight,
            }
        })
        .collect()
}

fn interpolate(
    gray: &GrayImage,
    luts: &[[u8; BINS]],
    tiles: u32,
    tile_width: u32,
    tile_height: u32,
) -> GrayImage {
    let (width, height) = gray.dimensions();
    let columns = axis_blends(width, tile_width, tiles);
    let rows = axis_blends(height, tile_height, tiles);
    let stride = tiles as usize;

    let mut out = GrayImage::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        let upper = &luts[row.first * stride..(row.first + 1) * stride];
        let lower = &luts[row.second * stride..(row.second + 1) * stride];
        let (ya, ya1) = (row.weight, 1.0 - row.weight);

        for (x, col) in columns.iter().enumerate() {
            let v = gray.get_pixel(x as u32, y as u32).0[0] as usize;
            let (xa, xa1) = (col.weight, 1.0 - col.weight);

            let top = upper[col.first][v] as f32 * xa1 + upper[col.second][v] as f32 * xa;
            let bottom = lower[col.first][v] as f32 * xa1 + lower[col.second][v] as f32 * xa;
            let res = top * ya1 + bottom * ya;

            out.get_pixel_mut(x as u32, y as u32).0[0] =
                res.round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
