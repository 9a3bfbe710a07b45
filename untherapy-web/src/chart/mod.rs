//! Chart module - radar, bars and dominant-emotion readout
//!
//! Re-exports only. All logic in submodules.

mod bars;
mod dominant;
mod radar;
mod view;

pub use bars::{emotion_color, BarLayout};
pub use dominant::DominantEmotion;
pub use radar::Radar;
pub use view::{EmotionChart, CHART_HEIGHT, CHART_WIDTH, PLACEHOLDER_CAPTION};
