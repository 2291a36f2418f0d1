//! Stencil WASM - WebAssembly bindings for the stencil pipeline
//!
//! This crate exposes stencil-core to the browser so the upload page can turn
//! a photo into a stencil without a round trip.
//!
//! # Module Structure
//!
//! - `stencil` - Stencil generation bindings (bytes in, PNG out)
//! - `types` - WASM-compatible wrapper types and error conversion
//!
//! # Usage
//!
//! ```typescript
//! import init, { generate_stencil } from '@stencil/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! try {
//!   const png = generate_stencil(bytes, 50);
//! } catch (message) {
//!   // "client error: ..." or "server error: ..."
//! }
//! ```

use wasm_bindgen::prelude::*;

mod stencil;
mod types;

// Re-export public types
pub use stencil::{generate_stencil, generate_stencil_image, mime_type, threshold_for};
pub use types::JsStencilImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
