//! Avatar module - cartoon faces for the user and the AI therapist
//!
//! Re-exports only. All logic in submodules.

mod ai;
mod blink;
mod user;

pub use ai::{AiAvatar, AiExpression, MouthShape, AI_CANVAS_SIZE};
pub use blink::{BlinkSchedule, BLINK_DURATION_MS};
pub use user::{draw_user_avatar, EyeState, UserMouth, UserPose, USER_CANVAS_SIZE};
