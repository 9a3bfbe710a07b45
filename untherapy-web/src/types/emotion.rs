//! Emotion vector - seven named scores plus timestamp
//!
//! Arrives from the backend (`emotion_update`) or is synthesized locally
//! from expressions. Drives the AI avatar and the emotion chart.

use serde::{Deserialize, Serialize};

/// Named emotions in their fixed enumeration order.
///
/// The order matters: dominant-emotion selection breaks ties in favour of
/// the first entry encountered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
    Neutral,
}

/// The six emotions shown on the radar and bar charts (no `Disgusted`)
pub const CHARTED_EMOTIONS: [Emotion; 6] = [
    Emotion::Happy,
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Fearful,
    Emotion::Surprised,
    Emotion::Neutral,
];

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
        Emotion::Neutral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Fearful => "Fearful",
            Emotion::Disgusted => "Disgusted",
            Emotion::Surprised => "Surprised",
            Emotion::Neutral => "Neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Fearful => "😨",
            Emotion::Disgusted => "🤢",
            Emotion::Surprised => "😲",
            Emotion::Neutral => "😐",
        }
    }
}

/// Probability-like distribution over named emotions.
///
/// `timestamp` is milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionVector {
    pub happy: f32,
    pub sad: f32,
    pub angry: f32,
    pub fearful: f32,
    pub disgusted: f32,
    pub surprised: f32,
    pub neutral: f32,
    pub timestamp: f64,
}

impl EmotionVector {
    pub fn get(&self, emotion: Emotion) -> f32 {
        match emotion {
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Fearful => self.fearful,
            Emotion::Disgusted => self.disgusted,
            Emotion::Surprised => self.surprised,
            Emotion::Neutral => self.neutral,
        }
    }

    /// Strongest of all seven emotions (first wins on tie)
    pub fn dominant(&self) -> (Emotion, f32) {
        Self::max_of(self, &Emotion::ALL)
    }

    /// Strongest of the six charted emotions (first wins on tie)
    pub fn dominant_charted(&self) -> (Emotion, f32) {
        Self::max_of(self, &CHARTED_EMOTIONS)
    }

    fn max_of(&self, candidates: &[Emotion]) -> (Emotion, f32) {
        let mut best = (candidates[0], self.get(candidates[0]));
        for &emotion in &candidates[1..] {
            let value = self.get(emotion);
            // Strict comparison keeps the earlier entry on ties
            if value > best.1 {
                best = (emotion, value);
            }
        }
        best
    }
}
