//! Simulated expression source
//!
//! Stand-in for a real model: expressions follow slow sine/cosine waves of
//! wall-clock time, so the avatar animates the same way regardless of what
//! the camera sees.

use std::cell::RefCell;
use std::f32::consts::TAU;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::source::{Detection, ExpressionSource};
use crate::camera::Frame;
use crate::error::{ModelLoadError, TrackingError};
use crate::types::{BoundingBox, ExpressionVector, FaceLandmarks, Keypoint, FACE_MESH_POINTS};

/// Face occupies this fraction of the shorter frame side
const FACE_FRACTION: f32 = 0.6;

/// Max positional jitter of a simulated keypoint (pixels)
const JITTER: f32 = 20.0;

/// Expressions at `t` seconds. Deterministic for a given `t`.
///
/// Waves are evaluated in f64: `t` is epoch time, far beyond f32 precision.
pub fn simulated_expressions(t: f64) -> ExpressionVector {
    let slow_wave = (t * 0.5).sin() * 0.5 + 0.5;
    let fast_wave = (t * 2.0).sin() * 0.3 + 0.5;

    ExpressionVector {
        eyes_open: (0.8 + (t * 0.1).sin() * 0.2) as f32,
        mouth_open: ((t * 0.3).sin() * 0.3).max(0.0) as f32,
        smiling: (slow_wave * 0.6 + 0.2) as f32,
        eyebrows_raised: (fast_wave * 0.4) as f32,
        head_tilt: ((t * 0.2).sin() * 0.3) as f32,
        head_turn: ((t * 0.15).cos() * 0.2) as f32,
    }
}

pub struct SimulatedSource {
    rng: RefCell<SmallRng>,
}

impl SimulatedSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Jittered ring of mesh points centred in the frame
    fn landmarks(&self, width: u32, height: u32) -> FaceLandmarks {
        let (w, h) = (width as f32, height as f32);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let face_size = w.min(h) * FACE_FRACTION;
        let mut rng = self.rng.borrow_mut();

        let keypoints = (0..FACE_MESH_POINTS)
            .map(|i| {
                let angle = i as f32 / FACE_MESH_POINTS as f32 * TAU;
                let radius = face_size / 2.0 * rng.gen_range(0.5..1.0);
                Keypoint {
                    x: cx + angle.cos() * radius + rng.gen_range(-0.5..0.5) * JITTER,
                    y: cy + angle.sin() * radius + rng.gen_range(-0.5..0.5) * JITTER,
                    z: rng.gen_range(-5.0..5.0),
                    name: Some(format!("point_{i}")),
                }
            })
            .collect();

        let half = face_size / 2.0;
        FaceLandmarks {
            keypoints,
            bounding_box: BoundingBox::from_corners(cx - half, cy - half, cx + half, cy + half),
        }
    }
}

#[async_trait(?Send)]
impl ExpressionSource for SimulatedSource {
    async fn initialize(&self) -> Result<(), ModelLoadError> {
        Ok(())
    }

    async fn analyze(&self, frame: &Frame, now_ms: f64) -> Result<Option<Detection>, TrackingError> {
        Ok(Some(Detection {
            landmarks: self.landmarks(frame.width, frame.height),
            expressions: simulated_expressions(now_ms / 1000.0),
        }))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
