//! WASM-compatible wrapper types for stencil results.
//!
//! This module provides JavaScript-friendly types that wrap the core stencil
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use stencil_core::{StencilError, StencilImage, StencilReport};
use wasm_bindgen::prelude::*;

/// A rendered stencil for JavaScript.
///
/// Holds both the raw single-channel pixels (for drawing straight onto a
/// canvas) and the encoded PNG (for download or upload).
///
/// # Memory Management
///
/// The buffers live in WASM memory. `pixels()` and `png()` copy into
/// JavaScript-owned `Uint8Array`s. `free()` may be called to release the WASM
/// side early; otherwise wasm-bindgen's finalizer handles it.
#[wasm_bindgen]
pub struct JsStencilImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    png: Vec<u8>,
    report: StencilReport,
}

#[wasm_bindgen]
impl JsStencilImage {
    /// Stencil width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Stencil height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 8-bit threshold the intensity mapped to
    #[wasm_bindgen(getter)]
    pub fn threshold(&self) -> u8 {
        self.report.threshold
    }

    /// Number of stroke pixels
    #[wasm_bindgen(getter)]
    pub fn edge_pixels(&self) -> usize {
        self.report.edge_pixels
    }

    /// Whether the upload was shrunk to the working resolution
    #[wasm_bindgen(getter)]
    pub fn downscaled(&self) -> bool {
        self.report.downscaled()
    }

    /// Single-channel pixel levels (0 or 255), row-major.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Encoded PNG bytes.
    pub fn png(&self) -> Vec<u8> {
        self.png.clone()
    }

    /// Full run summary as a plain JS object.
    pub fn report(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.report).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsStencilImage {
    pub(crate) fn from_stencil(stencil: StencilImage, report: StencilReport, png: Vec<u8>) -> Self {
        Self {
            width: stencil.width(),
            height: stencil.height(),
            pixels: stencil.into_gray().into_raw(),
            png,
            report,
        }
    }
}

/// Convert an optional JS number into a core intensity; absent means default.
pub(crate) fn intensity_from_js(value: Option<i32>) -> stencil_core::Intensity {
    stencil_core::Intensity::from(value.map(i64::from))
}

/// Message shown to the user for a failed transformation.
pub(crate) fn describe_error(err: &StencilError) -> String {
    let category = if err.is_client_error() {
        "client error"
    } else {
        "server error"
    };
    format!("{}: {}", category, err)
}

/// Log a failure to the browser console and wrap it for JavaScript.
pub(crate) fn error_to_js(err: StencilError) -> JsValue {
    let message = describe_error(&err);
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}
