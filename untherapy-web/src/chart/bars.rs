//! Bar list - one row per charted emotion

use crate::renderer::colors::{self, Rgba};
use crate::renderer::{Scene, Shape};
use crate::types::{Emotion, EmotionVector, CHARTED_EMOTIONS};

pub fn emotion_color(emotion: Emotion) -> Rgba {
    match emotion {
        Emotion::Happy => colors::HAPPY,
        Emotion::Sad => colors::SAD,
        Emotion::Angry => colors::ANGRY,
        Emotion::Fearful => colors::FEARFUL,
        Emotion::Surprised => colors::SURPRISED,
        Emotion::Neutral | Emotion::Disgusted => colors::NEUTRAL,
    }
}

/// Where the bar tracks sit; labels and percentages are HTML overlays
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarLayout {
    /// Top-left of the first track
    pub origin: [f32; 2],
    pub track_width: f32,
    pub bar_height: f32,
    pub row_height: f32,
}

impl BarLayout {
    /// Filled width for a value, clamped to the track
    pub fn fill_width(&self, value: f32) -> f32 {
        value.clamp(0.0, 1.0) * self.track_width
    }

    pub fn draw(&self, scene: &mut Scene, emotion: &EmotionVector) {
        for (row, &e) in CHARTED_EMOTIONS.iter().enumerate() {
            let min = [self.origin[0], self.origin[1] + row as f32 * self.row_height];
            scene.push(Shape::Rect {
                min,
                size: [self.track_width, self.bar_height],
                color: colors::MUTED,
            });
            scene.push(Shape::Rect {
                min,
                size: [self.fill_width(emotion.get(e)), self.bar_height],
                color: emotion_color(e),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BarLayout {
        BarLayout {
            origin: [0.0, 0.0],
            track_width: 200.0,
            bar_height: 6.0,
            row_height: 20.0,
        }
    }

    #[test]
    fn width_scales_with_value() {
        assert_eq!(layout().fill_width(0.25), 50.0);
        assert_eq!(layout().fill_width(1.7), 200.0);
        assert_eq!(layout().fill_width(-0.1), 0.0);
    }

    #[test]
    fn rows_follow_chart_order() {
        let mut scene = Scene::new(200, 200);
        let v = EmotionVector {
            angry: 0.5,
            ..Default::default()
        };
        layout().draw(&mut scene, &v);

        // Track + fill per row
        assert_eq!(scene.shapes().len(), 12);
        match &scene.shapes()[5] {
            Shape::Rect { min, size, color } => {
                assert_eq!(min[1], 40.0);
                assert_eq!(size[0], 100.0);
                assert_eq!(*color, colors::ANGRY);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }
}
