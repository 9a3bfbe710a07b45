//! Expression vector - six scalars describing the observed face

use serde::{Deserialize, Serialize};

/// Latest expression estimate for one processed frame.
///
/// Ranges:
/// - `eyes_open`, `mouth_open`, `smiling`: 0-1
/// - `eyebrows_raised`: 0-1 from landmarks, may go negative (-1) when frowning
/// - `head_tilt`, `head_turn`: -1 to 1
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionVector {
    pub eyes_open: f32,
    pub mouth_open: f32,
    pub smiling: f32,
    pub eyebrows_raised: f32,
    pub head_tilt: f32,
    pub head_turn: f32,
}

impl ExpressionVector {
    /// Clamp every field into its valid range
    pub fn clamped(self) -> Self {
        Self {
            eyes_open: self.eyes_open.clamp(0.0, 1.0),
            mouth_open: self.mouth_open.clamp(0.0, 1.0),
            smiling: self.smiling.clamp(0.0, 1.0),
            eyebrows_raised: self.eyebrows_raised.clamp(-1.0, 1.0),
            head_tilt: self.head_tilt.clamp(-1.0, 1.0),
            head_turn: self.head_turn.clamp(-1.0, 1.0),
        }
    }
}
