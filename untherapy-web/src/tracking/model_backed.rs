//! Model-backed expression source
//!
//! Runs a pretrained landmark detector over the frame and derives the
//! expression scalars from mesh geometry.

use async_trait::async_trait;

use super::geometry::calculate_expressions;
use super::source::{Detection, ExpressionSource};
use crate::camera::Frame;
use crate::error::{ModelLoadError, TrackingError};
use crate::types::FaceLandmarks;

/// A face landmark model (the browser one lives in JavaScript)
#[async_trait(?Send)]
pub trait LandmarkDetector {
    async fn load(&self) -> Result<(), ModelLoadError>;

    /// All faces found in the frame, best first
    async fn estimate(&self, frame: &Frame) -> Result<Vec<FaceLandmarks>, TrackingError>;
}

pub struct ModelBackedSource {
    detector: Option<Box<dyn LandmarkDetector>>,
}

impl ModelBackedSource {
    pub fn new(detector: Box<dyn LandmarkDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    /// Source whose page never supplied a detector; fails to initialize
    pub fn unavailable() -> Self {
        Self { detector: None }
    }
}

#[async_trait(?Send)]
impl ExpressionSource for ModelBackedSource {
    async fn initialize(&self) -> Result<(), ModelLoadError> {
        match &self.detector {
            Some(detector) => detector.load().await,
            None => Err(ModelLoadError::MissingBackend),
        }
    }

    async fn analyze(&self, frame: &Frame, _now_ms: f64) -> Result<Option<Detection>, TrackingError> {
        let Some(detector) = &self.detector else {
            return Ok(None);
        };
        let faces = detector.estimate(frame).await?;

        // Single-face model: only the first detection drives the avatar
        let Some(landmarks) = faces.into_iter().next() else {
            return Ok(None);
        };
        let expressions = calculate_expressions(&landmarks)?;

        Ok(Some(Detection {
            landmarks,
            expressions,
        }))
    }

    fn name(&self) -> &'static str {
        "model-backed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::mesh;
    use crate::types::{Keypoint, FACE_MESH_POINTS};
    use futures::executor::block_on;

    struct FixedDetector(Vec<FaceLandmarks>);

    #[async_trait(?Send)]
    impl LandmarkDetector for FixedDetector {
        async fn load(&self) -> Result<(), ModelLoadError> {
            Ok(())
        }

        async fn estimate(&self, _frame: &Frame) -> Result<Vec<FaceLandmarks>, TrackingError> {
            Ok(self.0.clone())
        }
    }

    fn open_mouth_face() -> FaceLandmarks {
        let mut keypoints = vec![Keypoint::default(); FACE_MESH_POINTS];
        keypoints[mesh::UPPER_LIP].y = 100.0;
        keypoints[mesh::LOWER_LIP].y = 115.0;
        FaceLandmarks {
            keypoints,
            ..Default::default()
        }
    }

    #[test]
    fn no_faces_yields_none() {
        let source = ModelBackedSource::new(Box::new(FixedDetector(vec![])));
        let result = block_on(source.analyze(&Frame::blank(4, 4), 0.0)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn first_face_drives_expressions() {
        let source = ModelBackedSource::new(Box::new(FixedDetector(vec![
            open_mouth_face(),
            FaceLandmarks::default(),
        ])));
        let detection = block_on(source.analyze(&Frame::blank(4, 4), 0.0))
            .unwrap()
            .unwrap();
        assert!((detection.expressions.mouth_open - 0.5).abs() < 1e-6);
    }

    #[test]
    fn truncated_mesh_is_a_frame_error() {
        let source = ModelBackedSource::new(Box::new(FixedDetector(vec![FaceLandmarks::default()])));
        assert!(block_on(source.analyze(&Frame::blank(4, 4), 0.0)).is_err());
    }

    #[test]
    fn missing_detector_fails_to_load() {
        let source = ModelBackedSource::unavailable();
        assert_eq!(
            block_on(source.initialize()),
            Err(ModelLoadError::MissingBackend)
        );
    }
}
