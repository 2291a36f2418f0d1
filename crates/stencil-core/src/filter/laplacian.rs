//! Second-derivative edge response.
//!
//! Uses the 3x3 aperture Laplacian (sum of the second-order Sobel
//! derivatives in x and y):
//!
//! ```text
//! | 2  0  2 |
//! | 0 -8  0 |
//! | 2  0  2 |
//! ```
//!
//! Responses are saturated into `0..=255`, so only the bright side of an edge
//! (where the centre is darker than its diagonal neighbours) produces output.
//! Borders are mirrored with reflect-101.

use image::GrayImage;

use super::reflect_101;

/// 3x3 Laplacian kernel, row-major.
pub const LAPLACIAN_KERNEL: [[i32; 3]; 3] = [[2, 0, 2], [0, -8, 0], [2, 0, 2]];

/// Compute the saturated Laplacian magnitude image.
pub fn laplacian(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let src = gray.as_raw();

    let mut out = GrayImage::new(width, height);
    let dst: &mut [u8] = &mut out;
    for y in 0..h {
        let rows = [
            reflect_101(y as i64 - 1, h) * w,
            y * w,
            reflect_101(y as i64 + 1, h) * w,
        ];
        for x in 0..w {
            let cols = [
                reflect_101(x as i64 - 1, w),
                x,
                reflect_101(x as i64 + 1, w),
            ];

            let mut acc = 0i32;
            for (ky, &row) in rows.iter().enumerate() {
                for (kx, &col) in cols.iter().enumerate() {
                    let k = LAPLACIAN_KERNEL[ky][kx];
                    if k != 0 {
                        acc += k * src[row + col] as i32;
                    }
                }
            }
            dst[y * w + x] = acc.clamp(0, 255) as u8;
        }
    }

    out
}
