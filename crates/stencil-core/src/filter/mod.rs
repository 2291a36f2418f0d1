//! Single-channel filters that make up the stencil pipeline.
//!
//! ## Stage Order
//! 1. Contrast-limited adaptive histogram equalization (`clahe`)
//! 2. 5x5 median denoise (`median`)
//! 3. 3x3 Laplacian edge response (`laplacian`)
//! 4. Global binarization (`threshold`)
//! 5. 2x2 closing and inversion (`morphology`)
//!
//! Every filter takes a `GrayImage` by reference and returns a new one.

pub mod clahe;
pub mod laplacian;
pub mod median;
pub mod morphology;
pub mod threshold;

pub use clahe::equalize_adaptive;
pub use laplacian::laplacian;
pub use median::median_filter;
pub use morphology::{close, dilate, erode, invert};
pub use threshold::{binarize, threshold_value};

/// Map a possibly out-of-range coordinate back into `0..len` by mirroring
/// around the edge pixel without repeating it (`gfedcb|abcdefgh|gfedcba`).
#[inline]
pub fn reflect_101(mut p: i64, len: usize) -> usize {
    let len = len as i64;
    if len <= 1 {
        return 0;
    }
    loop {
        if p < 0 {
            p = -p;
        } else if p >= len {
            p = 2 * len - 2 - p;
        } else {
            return p as usize;
        }
    }
}
