//! Image decoding and size normalization.
//!
//! This module provides functionality for:
//! - Decoding uploaded photographs (JPEG, PNG, BMP, GIF, TIFF, WebP) to RGB
//! - Applying EXIF orientation so phone portraits come out upright
//! - Bounding the working resolution before the stencil pipeline runs
//!
//! # Architecture
//!
//! Decoding is synchronous and allocation-local: every call produces a fresh
//! `DecodedImage` owned by the caller and nothing is cached between calls.
//!
//! # Examples
//!
//! ```ignore
//! use stencil_core::decode::{decode_image, resize_to_fit};
//!
//! let bytes = std::fs::read("portrait.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let bounded = resize_to_fit(&image, 1000).unwrap();
//! println!("Working at {}x{}", bounded.width, bounded.height);
//! ```

mod container;
mod resize;
mod types;

pub use container::decode_image;
pub use resize::{calculate_fit_dimensions, resize, resize_to_fit};
pub use types::{DecodeError, DecodedImage, Orientation};
