//! Local emotion estimate from the user's expressions
//!
//! A fixed heuristic, not a model. Which of this and the backend push is
//! shown is decided by `EmotionSource`.

use crate::types::{EmotionVector, ExpressionVector};

pub fn synthesize_emotion(e: &ExpressionVector, now_ms: f64) -> EmotionVector {
    EmotionVector {
        happy: e.smiling,
        sad: if e.mouth_open > 0.5 && e.smiling < 0.3 { 0.7 } else { 0.2 },
        angry: if e.eyebrows_raised < -0.3 { 0.6 } else { 0.1 },
        fearful: if e.eyes_open > 0.8 && e.eyebrows_raised > 0.5 { 0.5 } else { 0.1 },
        surprised: if e.eyebrows_raised > 0.7 { 0.8 } else { 0.1 },
        neutral: (1.0 - (e.smiling + e.eyebrows_raised.max(0.0))).max(0.0),
        disgusted: 0.1,
        timestamp: now_ms,
    }
}
