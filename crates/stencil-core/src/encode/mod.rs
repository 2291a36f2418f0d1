//! Stencil encoding.
//!
//! This module provides functionality for:
//! - Encoding single-channel grids to lossless 8-bit grayscale PNG
//!
//! # Examples
//!
//! ```ignore
//! use stencil_core::encode::encode_png;
//!
//! let pixels = vec![255u8; 100 * 100]; // Blank white sheet
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_png, EncodeError, PNG_SIGNATURE};
