//! Expression derivation from face-mesh geometry
//!
//! Each scalar is a pixel distance between named mesh points divided by an
//! empirically chosen scale, then clamped to its range.

use crate::error::TrackingError;
use crate::types::{ExpressionVector, FaceLandmarks};

// ============================================================================
// FACE MESH INDICES (MediaPipe FaceMesh - 468 total)
// ============================================================================

pub mod mesh {
    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;
    pub const UPPER_LIP: usize = 13;
    pub const LOWER_LIP: usize = 14;
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    pub const LEFT_BROW: usize = 70;
    pub const RIGHT_BROW: usize = 107;
    pub const NOSE_BRIDGE: usize = 168;
    pub const NOSE_BASE: usize = 2;
    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_CHEEK: usize = 454;
}

// ============================================================================
// SCALE CONSTANTS (pixels per unit)
// ============================================================================

const EYE_SCALE: f32 = 20.0;
const MOUTH_SCALE: f32 = 30.0;
const SMILE_SCALE: f32 = 10.0;
const BROW_SCALE: f32 = 30.0;
const TURN_SCALE: f32 = 200.0;
const TILT_SCALE: f32 = 100.0;

/// Derive the six expression scalars from one face
pub fn calculate_expressions(face: &FaceLandmarks) -> Result<ExpressionVector, TrackingError> {
    let p = |index: usize| face.point(index);

    // Eyelid gap, averaged over both eyes
    let left_eye = (p(mesh::LEFT_EYE_TOP)?.y - p(mesh::LEFT_EYE_BOTTOM)?.y).abs();
    let right_eye = (p(mesh::RIGHT_EYE_TOP)?.y - p(mesh::RIGHT_EYE_BOTTOM)?.y).abs();
    let eyes_open = ((left_eye + right_eye) / 2.0 / EYE_SCALE).min(1.0);

    // Lip gap
    let upper_lip = p(mesh::UPPER_LIP)?;
    let mouth_gap = (upper_lip.y - p(mesh::LOWER_LIP)?.y).abs();
    let mouth_open = (mouth_gap / MOUTH_SCALE).min(1.0);

    // Mouth corners relative to the lip centre (image y grows downward)
    let corners = (p(mesh::MOUTH_LEFT)?.y + p(mesh::MOUTH_RIGHT)?.y) / 2.0;
    let smiling = ((corners - upper_lip.y) / SMILE_SCALE).clamp(0.0, 1.0);

    // Brows above the nose bridge read as raised
    let brows = (p(mesh::LEFT_BROW)?.y + p(mesh::RIGHT_BROW)?.y) / 2.0;
    let brow_height = brows - p(mesh::NOSE_BRIDGE)?.y;
    let eyebrows_raised = (-brow_height / BROW_SCALE).clamp(0.0, 1.0);

    // Head pose from cheek spread and nose offset
    let left_cheek = p(mesh::LEFT_CHEEK)?;
    let right_cheek = p(mesh::RIGHT_CHEEK)?;
    let head_turn = ((right_cheek.x - left_cheek.x) / TURN_SCALE).clamp(-1.0, 1.0);
    let cheek_mid = (left_cheek.x + right_cheek.x) / 2.0;
    let head_tilt = ((p(mesh::NOSE_BASE)?.x - cheek_mid) / TILT_SCALE).clamp(-1.0, 1.0);

    Ok(ExpressionVector {
        eyes_open,
        mouth_open,
        smiling,
        eyebrows_raised,
        head_tilt,
        head_turn,
    })
}
