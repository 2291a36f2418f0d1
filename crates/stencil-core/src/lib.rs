//! Stencil Core - photo to tattoo stencil conversion
//!
//! This crate turns an uploaded photograph into a two-level line drawing that
//! can be traced onto skin. The whole transformation is one fixed, stateless
//! pipeline:
//!
//! decode → bound size → luma → CLAHE → median → Laplacian → threshold →
//! closing → invert → PNG
//!
//! The only tunable input is the [`Intensity`] (0-100), which sets the edge
//! threshold. Higher intensity keeps fewer, stronger lines.

pub mod decode;
pub mod encode;
pub mod filter;
pub mod histogram;
pub mod luminance;
pub mod stencil;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{encode_png, EncodeError};
pub use luminance::to_grayscale;
pub use stencil::{
    edge_map, edge_mask, render_stencil, render_stencil_with_report, transform,
    transform_with_config, StencilImage, StencilReport,
};

/// Content type of the encoded stencil.
pub const STENCIL_MIME_TYPE: &str = "image/png";

/// Edge-threshold control, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 50;

    /// Create an intensity, clamping out-of-range values into `0..=100`.
    pub fn new(value: i64) -> Self {
        let clamped = value.clamp(Self::MIN as i64, Self::MAX as i64);
        if clamped != value {
            log::warn!("intensity {} out of range, clamped to {}", value, clamped);
        }
        Self(clamped as u8)
    }

    /// Create an intensity, rejecting values outside `0..=100`.
    pub fn try_new(value: i64) -> Result<Self, StencilError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(StencilError::InvalidParameter { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<Option<i64>> for Intensity {
    fn from(value: Option<i64>) -> Self {
        value.map(Intensity::new).unwrap_or_default()
    }
}

/// Contrast-limited adaptive histogram equalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaheParams {
    /// Relative clip limit; `<= 0` disables clipping.
    pub clip_limit: f64,
    /// Tiles per axis, `1..=MAX_TILE_GRID`.
    pub tile_grid: u32,
}

impl ClaheParams {
    /// Largest accepted tile grid per axis.
    pub const MAX_TILE_GRID: u32 = 256;
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_grid: 8,
        }
    }
}

/// Fixed constants of the stencil pipeline.
///
/// `transform` always runs with `StencilConfig::default()`; the struct exists
/// so the constants live in one place and can be inspected or serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilConfig {
    /// Longest edge allowed before the input is downscaled.
    pub max_edge: u32,
    pub clahe: ClaheParams,
    /// Median window size (odd).
    pub median_size: u32,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            max_edge: 1000,
            clahe: ClaheParams::default(),
            median_size: 5,
        }
    }
}

impl StencilConfig {
    /// Largest accepted median window.
    pub const MAX_MEDIAN_SIZE: u32 = 255;

    /// Create the default pipeline configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject constants the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// `StencilError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), StencilError> {
        if self.max_edge == 0 {
            return Err(StencilError::InvalidConfig(
                "max_edge must be positive".to_string(),
            ));
        }
        if !(1..=ClaheParams::MAX_TILE_GRID).contains(&self.clahe.tile_grid) {
            return Err(StencilError::InvalidConfig(format!(
                "clahe.tile_grid {} is outside 1-{}",
                self.clahe.tile_grid,
                ClaheParams::MAX_TILE_GRID
            )));
        }
        if !self.clahe.clip_limit.is_finite() {
            return Err(StencilError::InvalidConfig(format!(
                "clahe.clip_limit {} is not finite",
                self.clahe.clip_limit
            )));
        }
        if self.median_size == 0 || self.median_size > Self::MAX_MEDIAN_SIZE {
            return Err(StencilError::InvalidConfig(format!(
                "median_size {} is outside 1-{}",
                self.median_size,
                Self::MAX_MEDIAN_SIZE
            )));
        }
        Ok(())
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Errors surfaced by the stencil transformation.
#[derive(Debug, Error)]
pub enum StencilError {
    /// The upload could not be decoded into an image.
    #[error("Could not decode image: {0}")]
    Decode(#[from] DecodeError),

    /// The finished stencil could not be serialized.
    #[error("Could not encode stencil: {0}")]
    Encode(#[from] EncodeError),

    /// Intensity outside `0..=100` passed to a strict constructor.
    #[error("Intensity {value} is outside the range 0-100")]
    InvalidParameter { value: i64 },

    /// Pipeline constants that cannot be run.
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

impl StencilError {
    /// True for failures caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StencilError::Decode(_) | StencilError::InvalidParameter { .. })
    }
}
