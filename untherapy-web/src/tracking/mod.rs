//! Tracking module - turns camera frames into expression vectors
//!
//! Re-exports only. All logic in submodules.

mod detector;
mod geometry;
mod model_backed;
mod simulated;
mod source;
mod throttle;
mod tracker;

pub use detector::{FaceMeshBackend, JsFaceMeshDetector};
pub use geometry::{calculate_expressions, mesh};
pub use model_backed::{LandmarkDetector, ModelBackedSource};
pub use simulated::{simulated_expressions, SimulatedSource};
pub use source::{Detection, ExpressionSource};
pub use throttle::FrameThrottle;
pub use tracker::{FaceTracker, TrackerStatus};
