//! Radar chart - six axes, polygon grid, filled data polygon

use std::f32::consts::FRAC_PI_2;

use crate::renderer::colors::{self, with_alpha, Rgba};
use crate::renderer::{Scene, Shape};
use crate::types::{EmotionVector, CHARTED_EMOTIONS};

/// Radius as a fraction of the half-extent of the chart area
const RADIUS_FRACTION: f32 = 0.65;
const SPLIT_COUNT: usize = 4;
const AXIS_COUNT: usize = CHARTED_EMOTIONS.len();

/// Placement of the radar within a scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Radar {
    pub center: [f32; 2],
    pub radius: f32,
}

impl Radar {
    /// Radar filling an area of `width` x `height` centred at `center`
    pub fn fit(center: [f32; 2], width: f32, height: f32) -> Self {
        Self {
            center,
            radius: width.min(height) / 2.0 * RADIUS_FRACTION,
        }
    }

    /// Point on axis `index` at `value` (0 = centre, 1 = rim).
    ///
    /// First axis points up, the rest follow counter-clockwise.
    pub fn axis_point(&self, index: usize, value: f32) -> [f32; 2] {
        let angle = FRAC_PI_2 + index as f32 * std::f32::consts::TAU / AXIS_COUNT as f32;
        let r = self.radius * value.clamp(0.0, 1.0);
        [
            self.center[0] + r * angle.cos(),
            self.center[1] - r * angle.sin(),
        ]
    }

    fn ring(&self, value: f32) -> Vec<[f32; 2]> {
        (0..AXIS_COUNT).map(|i| self.axis_point(i, value)).collect()
    }

    /// Split areas, split lines and axis lines
    pub fn draw_grid(&self, scene: &mut Scene) {
        let bands: [Rgba; 2] = [
            with_alpha(colors::SPLIT_AREA, 0.05),
            with_alpha(colors::SPLIT_AREA, 0.1),
        ];

        // Outer band first so each inner fill covers the one before
        for k in (1..=SPLIT_COUNT).rev() {
            scene.push(Shape::Fan {
                center: self.center,
                points: self.ring(k as f32 / SPLIT_COUNT as f32),
                color: colors::BACKGROUND,
            });
            scene.push(Shape::Fan {
                center: self.center,
                points: self.ring(k as f32 / SPLIT_COUNT as f32),
                color: bands[(k - 1) % 2],
            });
        }

        for k in 1..=SPLIT_COUNT {
            scene.push(Shape::Polyline {
                points: self.ring(k as f32 / SPLIT_COUNT as f32),
                width: 1.0,
                closed: true,
                color: colors::SPLIT_LINE,
            });
        }

        for i in 0..AXIS_COUNT {
            scene.push(Shape::Line {
                from: self.center,
                to: self.axis_point(i, 1.0),
                width: 1.0,
                color: colors::AXIS_LINE,
            });
        }
    }

    /// Filled series polygon with outline and vertex markers
    pub fn draw_series(&self, scene: &mut Scene, emotion: &EmotionVector) {
        let points: Vec<[f32; 2]> = CHARTED_EMOTIONS
            .iter()
            .enumerate()
            .map(|(i, &e)| self.axis_point(i, emotion.get(e)))
            .collect();

        scene.push(Shape::Fan {
            center: self.center,
            points: points.clone(),
            color: with_alpha(colors::SERIES, 0.2),
        });
        scene.push(Shape::Polyline {
            points: points.clone(),
            width: 2.0,
            closed: true,
            color: colors::SERIES,
        });
        for center in points {
            scene.push(Shape::Circle {
                center,
                radius: 3.0,
                color: colors::SERIES,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn first_axis_points_up() {
        let radar = Radar::fit([0.0, 0.0], 200.0, 200.0);
        assert!((radar.radius - 65.0).abs() < 1e-4);
        assert!(close(radar.axis_point(0, 1.0), [0.0, -65.0]));
    }

    #[test]
    fn axes_turn_counter_clockwise() {
        let radar = Radar::fit([0.0, 0.0], 200.0, 200.0);
        // Second axis (Sad) lands up and to the left
        let [x, y] = radar.axis_point(1, 1.0);
        assert!(x < 0.0 && y < 0.0);
    }

    #[test]
    fn values_are_clamped_to_rim() {
        let radar = Radar::fit([10.0, 10.0], 100.0, 100.0);
        assert!(close(radar.axis_point(3, 2.5), radar.axis_point(3, 1.0)));
        assert!(close(radar.axis_point(3, -1.0), [10.0, 10.0]));
    }

    #[test]
    fn series_has_one_marker_per_axis() {
        let radar = Radar::fit([0.0, 0.0], 200.0, 200.0);
        let mut scene = Scene::new(200, 200);
        radar.draw_series(&mut scene, &EmotionVector::default());
        let markers = scene
            .shapes()
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count();
        assert_eq!(markers, 6);
    }
}
