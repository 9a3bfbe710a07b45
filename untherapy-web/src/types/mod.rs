//! Types module - data shared between tracking, avatars, charts and session
//!
//! Re-exports only. All logic in submodules.

mod chat;
mod emotion;
mod expression;
mod landmarks;

pub use chat::{ChatMessage, Sender};
pub use emotion::{Emotion, EmotionVector, CHARTED_EMOTIONS};
pub use expression::ExpressionVector;
pub use landmarks::{BoundingBox, FaceLandmarks, Keypoint, FACE_MESH_POINTS};
