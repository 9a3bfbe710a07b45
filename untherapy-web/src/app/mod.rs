//! App module - session orchestration and the per-frame loop
//!
//! Re-exports only in mod.rs, logic in submodules.

mod controller;
mod overlay;
mod scheduler;
mod startup;
mod synth;

#[cfg(target_arch = "wasm32")]
mod engine;

pub use controller::{SessionController, SessionFlags, Transition};
pub use overlay::{status_text, FrameMetrics, StatusView};
pub use scheduler::LoopControl;
pub use startup::wait_until;
pub use synth::synthesize_emotion;

#[cfg(target_arch = "wasm32")]
pub use engine::Engine;
#[cfg(target_arch = "wasm32")]
pub use scheduler::AnimationLoop;
#[cfg(target_arch = "wasm32")]
pub use startup::sleep_ms;
