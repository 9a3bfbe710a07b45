//! Camera module - webcam capture through the browser media API
//!
//! Re-exports only. All logic in submodules.

mod capture;
mod constraints;
mod frame;

pub use capture::Camera;
pub use constraints::CameraConstraints;
pub use frame::Frame;
