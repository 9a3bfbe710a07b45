//! Emotion chart - placeholder or full radar + bars for one vector
//!
//! No smoothing: every update replaces the whole dataset.

use super::bars::BarLayout;
use super::dominant::DominantEmotion;
use super::radar::Radar;
use crate::renderer::colors;
use crate::renderer::{Scene, Shape};
use crate::types::EmotionVector;

pub const CHART_WIDTH: u32 = 320;
pub const CHART_HEIGHT: u32 = 400;

pub const PLACEHOLDER_CAPTION: &str = "Start a session to see emotion analysis";

/// Radar occupies the top 240 px, bars the rest
const RADAR_AREA_HEIGHT: f32 = 240.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmotionChart {
    Placeholder,
    Data(EmotionVector),
}

impl EmotionChart {
    pub fn from_emotion(emotion: Option<&EmotionVector>) -> Self {
        match emotion {
            Some(e) => EmotionChart::Data(*e),
            None => EmotionChart::Placeholder,
        }
    }

    pub fn dominant(&self) -> Option<DominantEmotion> {
        match self {
            EmotionChart::Data(e) => Some(DominantEmotion::of(e)),
            EmotionChart::Placeholder => None,
        }
    }

    pub fn caption(&self) -> Option<&'static str> {
        match self {
            EmotionChart::Placeholder => Some(PLACEHOLDER_CAPTION),
            EmotionChart::Data(_) => None,
        }
    }

    fn radar() -> Radar {
        let top = -(CHART_HEIGHT as f32) / 2.0;
        Radar::fit(
            [0.0, top + RADAR_AREA_HEIGHT / 2.0],
            CHART_WIDTH as f32,
            RADAR_AREA_HEIGHT,
        )
    }

    fn bars() -> BarLayout {
        let top = -(CHART_HEIGHT as f32) / 2.0;
        let half_w = CHART_WIDTH as f32 / 2.0;
        BarLayout {
            origin: [-half_w + 90.0, top + RADAR_AREA_HEIGHT + 20.0],
            track_width: CHART_WIDTH as f32 - 140.0,
            bar_height: 6.0,
            row_height: 22.0,
        }
    }

    pub fn draw(&self) -> Scene {
        let mut scene = Scene::new(CHART_WIDTH, CHART_HEIGHT);
        let radar = Self::radar();
        radar.draw_grid(&mut scene);

        match self {
            EmotionChart::Placeholder => scene.push(Shape::Circle {
                center: radar.center,
                radius: 32.0,
                color: colors::MUTED,
            }),
            EmotionChart::Data(emotion) => {
                radar.draw_series(&mut scene, emotion);
                Self::bars().draw(&mut scene, emotion);
            }
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_vector_means_placeholder() {
        let chart = EmotionChart::from_emotion(None);
        assert_eq!(chart, EmotionChart::Placeholder);
        assert_eq!(chart.caption(), Some(PLACEHOLDER_CAPTION));
        assert!(chart.dominant().is_none());
    }

    #[test]
    fn placeholder_has_no_bars() {
        let shapes = EmotionChart::Placeholder.draw();
        assert!(!shapes.shapes().iter().any(|s| matches!(s, Shape::Rect { .. })));
    }

    #[test]
    fn data_chart_fits_canvas() {
        let v = EmotionVector {
            happy: 1.0,
            neutral: 1.0,
            ..Default::default()
        };
        let chart = EmotionChart::from_emotion(Some(&v));
        assert_eq!(chart.dominant().map(|d| d.percent), Some(100));
        assert!(chart.caption().is_none());

        let vertices = chart.draw().vertices();
        assert!(vertices
            .iter()
            .all(|v| v.position[0].abs() <= 1.0 && v.position[1].abs() <= 1.0));
    }
}
