//! Scene - device-independent list of shapes for one canvas
//!
//! Avatars and charts build a `Scene` every time they redraw. The GPU layer
//! only ever sees the flattened clip-space vertices.

use super::colors::{Rgba, BACKGROUND};
use super::shapes::{
    arc_vertices, ellipse_vertices, fan_vertices, line_vertices, polyline_vertices,
    rect_vertices, sector_vertices, Vertex,
};

/// One drawable primitive. Coordinates are pixels from the canvas centre.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { center: [f32; 2], radius: f32, color: Rgba },
    Ellipse { center: [f32; 2], rx: f32, ry: f32, color: Rgba },
    EllipseOutline { center: [f32; 2], rx: f32, ry: f32, width: f32, color: Rgba },
    Line { from: [f32; 2], to: [f32; 2], width: f32, color: Rgba },
    /// Stroked circular arc, angles in radians
    Arc { center: [f32; 2], radius: f32, start: f32, end: f32, width: f32, color: Rgba },
    /// Filled pie slice
    Sector { center: [f32; 2], radius: f32, start: f32, end: f32, color: Rgba },
    /// Filled polygon that is star-shaped around `center`
    Fan { center: [f32; 2], points: Vec<[f32; 2]>, color: Rgba },
    Polyline { points: Vec<[f32; 2]>, width: f32, closed: bool, color: Rgba },
    Rect { min: [f32; 2], size: [f32; 2], color: Rgba },
}

impl Shape {
    fn tessellate(&self) -> Vec<Vertex> {
        match self {
            Shape::Circle { center, radius, color } => {
                ellipse_vertices(*center, *radius, *radius, *color)
            }
            Shape::Ellipse { center, rx, ry, color } => ellipse_vertices(*center, *rx, *ry, *color),
            Shape::EllipseOutline { center, rx, ry, width, color } => {
                arc_vertices(*center, *rx, *ry, 0.0, std::f32::consts::TAU, *width, *color)
            }
            Shape::Line { from, to, width, color } => line_vertices(*from, *to, *width, *color),
            Shape::Arc { center, radius, start, end, width, color } => {
                arc_vertices(*center, *radius, *radius, *start, *end, *width, *color)
            }
            Shape::Sector { center, radius, start, end, color } => {
                sector_vertices(*center, *radius, *start, *end, *color)
            }
            Shape::Fan { center, points, color } => fan_vertices(*center, points, *color),
            Shape::Polyline { points, width, closed, color } => {
                polyline_vertices(points, *width, *closed, *color)
            }
            Shape::Rect { min, size, color } => rect_vertices(*min, *size, *color),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    /// Rotation of the whole drawing about the centre (radians, clockwise)
    pub rotation: Option<f32>,
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: BACKGROUND,
            rotation: None,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn rotated(mut self, angle: f32) -> Self {
        self.rotation = Some(angle);
        self
    }

    /// Flatten into a clip-space triangle list, painter's order
    pub fn vertices(&self) -> Vec<Vertex> {
        let half_w = self.width.max(1) as f32 / 2.0;
        let half_h = self.height.max(1) as f32 / 2.0;
        let (sin, cos) = self.rotation.unwrap_or(0.0).sin_cos();

        self.shapes
            .iter()
            .flat_map(Shape::tessellate)
            .map(|v| {
                let [x, y] = v.position;
                let (rx, ry) = (x * cos - y * sin, x * sin + y * cos);
                Vertex {
                    position: [rx / half_w, -ry / half_h],
                    color: v.color,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors::BLACK;

    #[test]
    fn maps_pixels_to_clip_space() {
        let mut scene = Scene::new(200, 100);
        scene.push(Shape::Rect { min: [0.0, 0.0], size: [100.0, 50.0], color: BLACK });
        let v = scene.vertices();
        // Bottom-right corner in pixels is (1, -1) in clip space
        assert_eq!(v[2].position, [1.0, -1.0]);
        assert_eq!(v[0].position, [0.0, 0.0]);
    }

    #[test]
    fn rotation_turns_clockwise_on_screen() {
        let mut scene = Scene::new(100, 100).rotated(std::f32::consts::FRAC_PI_2);
        scene.push(Shape::Line { from: [10.0, 0.0], to: [20.0, 0.0], width: 2.0, color: BLACK });
        let v = scene.vertices();
        // A point right of centre moves below it
        let centre_x: f32 = v.iter().map(|v| v.position[0]).sum::<f32>() / v.len() as f32;
        let centre_y: f32 = v.iter().map(|v| v.position[1]).sum::<f32>() / v.len() as f32;
        assert!(centre_x.abs() < 1e-4);
        assert!(centre_y < -0.2);
    }

    #[test]
    fn empty_scene_only_clears_to_background() {
        let scene = Scene::new(300, 300);
        assert!(scene.vertices().is_empty());
        assert_eq!(scene.background, BACKGROUND);
    }

    #[test]
    fn shapes_keep_painter_order() {
        let mut scene = Scene::new(10, 10);
        scene.push(Shape::Circle { center: [0.0, 0.0], radius: 2.0, color: BLACK });
        scene.push(Shape::Rect { min: [0.0, 0.0], size: [1.0, 1.0], color: [1.0, 0.0, 0.0, 1.0] });
        let v = scene.vertices();
        assert_eq!(v.first().map(|v| v.color), Some(BLACK));
        assert_eq!(v.last().map(|v| v.color), Some([1.0, 0.0, 0.0, 1.0]));
    }
}
