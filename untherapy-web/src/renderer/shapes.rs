//! Shape primitives - triangle-list tessellation in scene pixel space
//!
//! Positions are pixels relative to the canvas centre, y pointing down,
//! so angles sweep clockwise on screen (same convention as a 2D canvas).

use std::f32::consts::TAU;

use super::colors::Rgba;

/// Vertex structure for rendering colored shapes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Segments used for a full turn
const FULL_TURN_SEGMENTS: u32 = 48;

fn segments_for(sweep: f32) -> u32 {
    ((sweep.abs() / TAU) * FULL_TURN_SEGMENTS as f32).ceil().max(2.0) as u32
}

fn on_ellipse(center: [f32; 2], rx: f32, ry: f32, angle: f32) -> [f32; 2] {
    [center[0] + rx * angle.cos(), center[1] + ry * angle.sin()]
}

/// Filled ellipse (triangle fan around the centre)
pub fn ellipse_vertices(center: [f32; 2], rx: f32, ry: f32, color: Rgba) -> Vec<Vertex> {
    sector_vertices_xy(center, rx, ry, 0.0, TAU, color)
}

/// Filled pie slice from `start` to `end` radians
pub fn sector_vertices(center: [f32; 2], radius: f32, start: f32, end: f32, color: Rgba) -> Vec<Vertex> {
    sector_vertices_xy(center, radius, radius, start, end, color)
}

fn sector_vertices_xy(
    center: [f32; 2],
    rx: f32,
    ry: f32,
    start: f32,
    end: f32,
    color: Rgba,
) -> Vec<Vertex> {
    let segments = segments_for(end - start);
    let step = (end - start) / segments as f32;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let a1 = start + step * i as f32;
        let a2 = start + step * (i + 1) as f32;

        vertices.push(Vertex { position: center, color });
        vertices.push(Vertex { position: on_ellipse(center, rx, ry, a1), color });
        vertices.push(Vertex { position: on_ellipse(center, rx, ry, a2), color });
    }

    vertices
}

/// Stroked elliptical arc of the given line width
pub fn arc_vertices(
    center: [f32; 2],
    rx: f32,
    ry: f32,
    start: f32,
    end: f32,
    width: f32,
    color: Rgba,
) -> Vec<Vertex> {
    let half = width / 2.0;
    let segments = segments_for(end - start);
    let step = (end - start) / segments as f32;
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let a1 = start + step * i as f32;
        let a2 = start + step * (i + 1) as f32;

        let inner1 = on_ellipse(center, rx - half, ry - half, a1);
        let outer1 = on_ellipse(center, rx + half, ry + half, a1);
        let inner2 = on_ellipse(center, rx - half, ry - half, a2);
        let outer2 = on_ellipse(center, rx + half, ry + half, a2);

        vertices.extend([
            Vertex { position: inner1, color },
            Vertex { position: outer1, color },
            Vertex { position: outer2, color },
            Vertex { position: inner1, color },
            Vertex { position: outer2, color },
            Vertex { position: inner2, color },
        ]);
    }

    vertices
}

/// Generate vertices for a line segment (rendered as a quad `width` thick)
pub fn line_vertices(from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) -> Vec<Vertex> {
    let [x1, y1] = from;
    let [x2, y2] = to;
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len = (dx * dx + dy * dy).sqrt();

    if len < 0.001 {
        return vec![];
    }

    // Perpendicular direction for line thickness
    let px = -dy / len * width / 2.0;
    let py = dx / len * width / 2.0;

    vec![
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x1 + px, y1 + py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x2 - px, y2 - py], color },
    ]
}

/// Connected line segments, optionally closing back to the first point
pub fn polyline_vertices(points: &[[f32; 2]], width: f32, closed: bool, color: Rgba) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for pair in points.windows(2) {
        vertices.extend(line_vertices(pair[0], pair[1], width, color));
    }
    if closed && points.len() > 2 {
        vertices.extend(line_vertices(points[points.len() - 1], points[0], width, color));
    }
    vertices
}

/// Star-shaped polygon filled by fanning from `center`
pub fn fan_vertices(center: [f32; 2], points: &[[f32; 2]], color: Rgba) -> Vec<Vertex> {
    if points.len() < 2 {
        return vec![];
    }
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for i in 0..points.len() {
        let next = points[(i + 1) % points.len()];
        vertices.push(Vertex { position: center, color });
        vertices.push(Vertex { position: points[i], color });
        vertices.push(Vertex { position: next, color });
    }
    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect_vertices(min: [f32; 2], size: [f32; 2], color: Rgba) -> Vec<Vertex> {
    if size[0] <= 0.0 || size[1] <= 0.0 {
        return vec![];
    }
    let [x1, y1] = min;
    let (x2, y2) = (x1 + size[0], y1 + size[1]);
    vec![
        Vertex { position: [x1, y1], color },
        Vertex { position: [x2, y1], color },
        Vertex { position: [x2, y2], color },
        Vertex { position: [x1, y1], color },
        Vertex { position: [x2, y2], color },
        Vertex { position: [x1, y2], color },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors::BLACK;

    #[test]
    fn full_ellipse_uses_full_segment_count() {
        let v = ellipse_vertices([0.0, 0.0], 10.0, 5.0, BLACK);
        assert_eq!(v.len(), (FULL_TURN_SEGMENTS * 3) as usize);
        // Second vertex sits on the x radius
        assert_eq!(v[1].position, [10.0, 0.0]);
    }

    #[test]
    fn degenerate_line_is_empty() {
        assert!(line_vertices([1.0, 1.0], [1.0, 1.0], 3.0, BLACK).is_empty());
    }

    #[test]
    fn line_thickness_is_full_width() {
        let v = line_vertices([0.0, 0.0], [10.0, 0.0], 4.0, BLACK);
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        let span = ys.iter().cloned().fold(f32::MIN, f32::max) - ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((span - 4.0).abs() < 1e-5);
    }

    #[test]
    fn closed_polyline_adds_closing_segment() {
        let tri = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]];
        assert_eq!(polyline_vertices(&tri, 1.0, false, BLACK).len(), 12);
        assert_eq!(polyline_vertices(&tri, 1.0, true, BLACK).len(), 18);
    }

    #[test]
    fn lower_half_arc_stays_below_centre() {
        // 0.2pi..0.8pi is the bottom of the circle when y points down
        let v = arc_vertices([0.0, 0.0], 25.0, 25.0, 0.2 * std::f32::consts::PI, 0.8 * std::f32::consts::PI, 3.0, BLACK);
        assert!(v.iter().all(|v| v.position[1] > 0.0));
    }

    #[test]
    fn empty_rect_is_skipped() {
        assert!(rect_vertices([0.0, 0.0], [0.0, 4.0], BLACK).is_empty());
        assert_eq!(rect_vertices([0.0, 0.0], [2.0, 4.0], BLACK).len(), 6);
    }
}
