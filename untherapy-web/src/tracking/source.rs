//! Expression source interface shared by the simulated and model-backed variants

use async_trait::async_trait;

use crate::camera::Frame;
use crate::error::{ModelLoadError, TrackingError};
use crate::types::{ExpressionVector, FaceLandmarks};

/// Result of analyzing one frame with a face in it
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub landmarks: FaceLandmarks,
    pub expressions: ExpressionVector,
}

/// Produces expression estimates from frames.
///
/// Runs on the single browser thread, hence `?Send`.
#[async_trait(?Send)]
pub trait ExpressionSource {
    /// Load whatever the source needs before `analyze` can be called
    async fn initialize(&self) -> Result<(), ModelLoadError>;

    /// Analyze one frame. `Ok(None)` means no face was found.
    async fn analyze(&self, frame: &Frame, now_ms: f64) -> Result<Option<Detection>, TrackingError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
