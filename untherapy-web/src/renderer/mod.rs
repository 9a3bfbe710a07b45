//! Renderer module - scenes tessellated to triangles, presented with WebGPU
//!
//! Re-exports only. All logic in submodules.

pub mod colors;
mod scene;
mod shapes;
#[cfg(target_arch = "wasm32")]
mod state;

pub use scene::{Scene, Shape};
pub use shapes::Vertex;
#[cfg(target_arch = "wasm32")]
pub use state::{CanvasKind, Renderer};
