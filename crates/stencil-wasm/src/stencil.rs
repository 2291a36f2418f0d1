//! Stencil generation WASM bindings.
//!
//! This is the request boundary: the page hands over the uploaded file's bytes
//! and the slider value, and gets PNG bytes (or a message) back.
//!
//! # Functions
//!
//! - [`generate_stencil`] - Uploaded image bytes to PNG stencil bytes
//! - [`generate_stencil_image`] - Same, plus raw pixels and a run summary
//! - [`threshold_for`] - The 8-bit threshold an intensity maps to
//!
//! # Example
//!
//! ```typescript
//! import { generate_stencil, mime_type } from '@stencil/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const png = generate_stencil(bytes, Number(slider.value));
//! img.src = URL.createObjectURL(new Blob([png], { type: mime_type() }));
//! ```

use crate::types::{error_to_js, intensity_from_js, JsStencilImage};
use stencil_core::{render_stencil_with_report, transform, StencilConfig, StencilError};
use wasm_bindgen::prelude::*;

/// Convert uploaded image bytes into a PNG stencil.
///
/// # Arguments
///
/// * `bytes` - The uploaded file's bytes (JPEG, PNG, BMP, GIF, TIFF or WebP)
/// * `intensity` - Edge threshold control, 0-100. `undefined` means 50;
///   out-of-range values are clamped.
///
/// # Errors
///
/// Returns a string prefixed with `client error:` when the upload is not a
/// decodable image, or `server error:` when the stencil cannot be encoded.
/// Failures are also logged to the browser console.
#[wasm_bindgen]
pub fn generate_stencil(bytes: &[u8], intensity: Option<i32>) -> Result<Vec<u8>, JsValue> {
    transform(bytes, intensity_from_js(intensity)).map_err(error_to_js)
}

/// Convert uploaded image bytes into a stencil, keeping the raw pixels and a
/// summary of the run alongside the PNG.
#[wasm_bindgen]
pub fn generate_stencil_image(
    bytes: &[u8],
    intensity: Option<i32>,
) -> Result<JsStencilImage, JsValue> {
    render(bytes, intensity).map_err(error_to_js)
}

/// The 8-bit threshold a slider value maps to.
#[wasm_bindgen]
pub fn threshold_for(intensity: Option<i32>) -> u8 {
    stencil_core::filter::threshold_value(intensity_from_js(intensity))
}

/// Content type of the generated stencil.
#[wasm_bindgen]
pub fn mime_type() -> String {
    stencil_core::STENCIL_MIME_TYPE.to_string()
}

fn render(bytes: &[u8], intensity: Option<i32>) -> Result<JsStencilImage, StencilError> {
    let image = stencil_core::decode_image(bytes)?;
    let (stencil, report) =
        render_stencil_with_report(&image, intensity_from_js(intensity), &StencilConfig::default())?;
    let png = stencil.encode()?;
    Ok(JsStencilImage::from_stencil(stencil, report, png))
}
