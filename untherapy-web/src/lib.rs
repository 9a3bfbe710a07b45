//! UnTherapy Web - AI therapy session demo
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod app;
pub mod avatar;
pub mod camera;
pub mod chart;
pub mod config;
pub mod error;
pub mod renderer;
pub mod session;
pub mod telemetry;
pub mod tracking;
pub mod types;

#[cfg(target_arch = "wasm32")]
mod bridge;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use bridge::UnTherapyApp;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
