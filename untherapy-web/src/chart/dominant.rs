//! Dominant emotion readout (icon, label, rounded intensity)

use serde::Serialize;

use crate::types::{Emotion, EmotionVector};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DominantEmotion {
    #[serde(skip)]
    pub emotion: Emotion,
    pub name: &'static str,
    pub emoji: &'static str,
    pub value: f32,
    /// `value` as a rounded percentage
    pub percent: u32,
}

impl DominantEmotion {
    /// Strongest charted emotion, first wins on ties
    pub fn of(vector: &EmotionVector) -> Self {
        let (emotion, value) = vector.dominant_charted();
        Self {
            emotion,
            name: emotion.label(),
            emoji: emotion.emoji(),
            value,
            percent: (value * 100.0).round().max(0.0) as u32,
        }
    }
}
