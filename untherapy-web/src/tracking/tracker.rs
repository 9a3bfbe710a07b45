//! Face tracker - readiness, throttling and latest-value storage
//!
//! Wraps an expression source. All methods take `&self` so the tracker can
//! be shared (`Rc`) between the frame loop and in-flight analyses without
//! holding a borrow across an await.

use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};

use super::source::ExpressionSource;
use super::throttle::FrameThrottle;
use crate::camera::Frame;
use crate::error::ModelLoadError;
use crate::types::{ExpressionVector, FaceLandmarks};

/// Emit a status line every this many analyzed frames
const STATUS_LOG_INTERVAL: u64 = 180;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerStatus {
    Loading,
    Ready,
    /// Durable until `initialize` succeeds again
    Failed(String),
}

pub struct FaceTracker {
    source: Box<dyn ExpressionSource>,
    status: RefCell<TrackerStatus>,
    throttle: RefCell<FrameThrottle>,
    landmarks: RefCell<Option<FaceLandmarks>>,
    expressions: Cell<Option<ExpressionVector>>,
    /// Bumped on every write to `expressions` (including clears)
    revision: Cell<u64>,
    analyzed: Cell<u64>,
}

impl FaceTracker {
    pub fn new(source: Box<dyn ExpressionSource>, process_every: u32) -> Self {
        Self {
            source,
            status: RefCell::new(TrackerStatus::Loading),
            throttle: RefCell::new(FrameThrottle::new(process_every)),
            landmarks: RefCell::new(None),
            expressions: Cell::new(None),
            revision: Cell::new(0),
            analyzed: Cell::new(0),
        }
    }

    /// Load the source. On failure the error is kept as a durable status.
    pub async fn initialize(&self) -> Result<(), ModelLoadError> {
        *self.status.borrow_mut() = TrackerStatus::Loading;
        info!("🤖 Initializing face tracking ({})...", self.source.name());

        match self.source.initialize().await {
            Ok(()) => {
                *self.status.borrow_mut() = TrackerStatus::Ready;
                info!("✅ Face tracking ready ({})", self.source.name());
                Ok(())
            }
            Err(err) => {
                warn!("❌ Face tracking error: {err}");
                *self.status.borrow_mut() = TrackerStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn status(&self) -> TrackerStatus {
        self.status.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        *self.status.borrow() == TrackerStatus::Ready
    }

    /// Analyze a frame if the tracker is ready and the throttle admits it.
    ///
    /// Returns true when an analysis ran. Frame errors are logged and
    /// leave the previous result in place.
    pub async fn process_frame(&self, frame: &Frame, now_ms: f64) -> bool {
        if !self.is_ready() || !self.throttle.borrow_mut().admit() {
            return false;
        }

        match self.source.analyze(frame, now_ms).await {
            Ok(Some(detection)) => {
                *self.landmarks.borrow_mut() = Some(detection.landmarks);
                self.set_expressions(Some(detection.expressions.clamped()));
            }
            Ok(None) => {
                *self.landmarks.borrow_mut() = None;
                self.set_expressions(None);
            }
            Err(err) => {
                warn!("⚠️ Face tracking frame processing error: {err}");
                return true;
            }
        }

        let analyzed = self.analyzed.get() + 1;
        self.analyzed.set(analyzed);
        if analyzed % STATUS_LOG_INTERVAL == 0 {
            debug!(
                "📊 Face tracking active ({}) - expressions: {:?}",
                self.source.name(),
                self.expressions.get()
            );
        }
        true
    }

    fn set_expressions(&self, expressions: Option<ExpressionVector>) {
        self.expressions.set(expressions);
        self.revision.set(self.revision.get() + 1);
    }

    pub fn expressions(&self) -> Option<ExpressionVector> {
        self.expressions.get()
    }

    pub fn landmarks(&self) -> Option<FaceLandmarks> {
        self.landmarks.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Forget the current face (session stopped)
    pub fn reset(&self) {
        self.throttle.borrow_mut().reset();
        *self.landmarks.borrow_mut() = None;
        self.set_expressions(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackingError;
    use crate::tracking::{simulated_expressions, Detection, SimulatedSource};
    use async_trait::async_trait;
    use futures::executor::block_on;

    struct BrokenModel;

    #[async_trait(?Send)]
    impl ExpressionSource for BrokenModel {
        async fn initialize(&self) -> Result<(), ModelLoadError> {
            Err(ModelLoadError::Backend("weights 404".into()))
        }

        async fn analyze(&self, _: &Frame, _: f64) -> Result<Option<Detection>, TrackingError> {
            unreachable!("never ready")
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct FlakyModel;

    #[async_trait(?Send)]
    impl ExpressionSource for FlakyModel {
        async fn initialize(&self) -> Result<(), ModelLoadError> {
            Ok(())
        }

        async fn analyze(&self, _: &Frame, now_ms: f64) -> Result<Option<Detection>, TrackingError> {
            if now_ms < 0.0 {
                Err(TrackingError::Detector("bad frame".into()))
            } else if now_ms == 0.0 {
                Ok(None)
            } else {
                Ok(Some(Detection {
                    landmarks: FaceLandmarks::default(),
                    expressions: simulated_expressions(now_ms / 1000.0),
                }))
            }
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    struct OvershootingModel;

    #[async_trait(?Send)]
    impl ExpressionSource for OvershootingModel {
        async fn initialize(&self) -> Result<(), ModelLoadError> {
            Ok(())
        }

        async fn analyze(&self, _: &Frame, _: f64) -> Result<Option<Detection>, TrackingError> {
            Ok(Some(Detection {
                landmarks: FaceLandmarks::default(),
                expressions: ExpressionVector {
                    eyes_open: 1.3,
                    mouth_open: -0.1,
                    smiling: 0.4,
                    eyebrows_raised: -1.5,
                    head_tilt: 0.2,
                    head_turn: 2.0,
                },
            }))
        }

        fn name(&self) -> &'static str {
            "overshooting"
        }
    }

    fn frame() -> Frame {
        Frame::blank(8, 8)
    }

    #[test]
    fn frames_are_ignored_until_ready() {
        let tracker = FaceTracker::new(Box::new(SimulatedSource::new(1)), 1);
        assert!(!block_on(tracker.process_frame(&frame(), 1000.0)));
        assert!(tracker.expressions().is_none());

        block_on(tracker.initialize()).unwrap();
        assert!(block_on(tracker.process_frame(&frame(), 1000.0)));
        assert_eq!(tracker.expressions(), Some(simulated_expressions(1.0)));
    }

    #[test]
    fn only_every_third_frame_is_analyzed() {
        let tracker = FaceTracker::new(Box::new(SimulatedSource::new(1)), 3);
        block_on(tracker.initialize()).unwrap();

        let ran: Vec<bool> = (1..=6)
            .map(|i| block_on(tracker.process_frame(&frame(), i as f64 * 16.0)))
            .collect();
        assert_eq!(ran, [false, false, true, false, false, true]);
        assert_eq!(tracker.revision(), 2);
    }

    #[test]
    fn load_failure_is_durable_and_retryable() {
        let tracker = FaceTracker::new(Box::new(BrokenModel), 1);
        assert!(block_on(tracker.initialize()).is_err());
        assert_eq!(
            tracker.status(),
            TrackerStatus::Failed("Failed to load face detection model: weights 404".into())
        );
        assert!(!block_on(tracker.process_frame(&frame(), 5.0)));
    }

    #[test]
    fn no_face_clears_and_errors_keep_last_value() {
        let tracker = FaceTracker::new(Box::new(FlakyModel), 1);
        block_on(tracker.initialize()).unwrap();

        block_on(tracker.process_frame(&frame(), 2000.0));
        let seen = tracker.expressions();
        assert!(seen.is_some());

        // A failing frame is swallowed
        assert!(block_on(tracker.process_frame(&frame(), -1.0)));
        assert_eq!(tracker.expressions(), seen);

        // No face clears both landmarks and expressions
        block_on(tracker.process_frame(&frame(), 0.0));
        assert!(tracker.expressions().is_none());
        assert!(tracker.landmarks().is_none());
    }

    #[test]
    fn stored_expressions_are_clamped() {
        let tracker = FaceTracker::new(Box::new(OvershootingModel), 1);
        block_on(tracker.initialize()).unwrap();
        block_on(tracker.process_frame(&frame(), 10.0));

        let e = tracker.expressions().unwrap();
        assert_eq!(e.eyes_open, 1.0);
        assert_eq!(e.mouth_open, 0.0);
        assert_eq!(e.smiling, 0.4);
        assert_eq!(e.eyebrows_raised, -1.0);
        assert_eq!(e.head_turn, 1.0);
        assert!(tracker.landmarks().is_some());
    }

    #[test]
    fn reset_clears_current_face() {
        let tracker = FaceTracker::new(Box::new(SimulatedSource::new(1)), 1);
        block_on(tracker.initialize()).unwrap();
        block_on(tracker.process_frame(&frame(), 500.0));
        tracker.reset();
        assert!(tracker.expressions().is_none());
        assert!(tracker.landmarks().is_none());
    }
}
