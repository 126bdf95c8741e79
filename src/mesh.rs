//! Coloured triangle lists in surface pixels.
//!
//! Everything the board shows is tessellated here: thick lines become quads
//! along the segment normal, circles become fans, curves are sampled into
//! polylines. The same mesh feeds the GPU pipeline and the software
//! rasteriser used for export.

use std::f32::consts::{PI, TAU};

use crate::drawing::{Color, Point};
use crate::vertex::Vertex;

pub const CIRCLE_SEGMENTS: u32 = 32;
const CURVE_SEGMENTS: u32 = 24;

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends `other`, keeping its draw order after ours.
    pub fn extend(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|index| index + offset));
    }

    pub fn translate(&mut self, offset: Point) {
        for vertex in &mut self.vertices {
            vertex.position[0] += offset[0];
            vertex.position[1] += offset[1];
        }
    }

    fn push_quad(&mut self, corners: [Point; 4], color: Color) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .iter()
                .map(|&position| Vertex { position, color }),
        );
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Segment of the given thickness. Zero-length segments add nothing.
    pub fn line(&mut self, p1: Point, p2: Point, width: f32, color: Color) {
        let dx = p2[0] - p1[0];
        let dy = p2[1] - p1[1];
        let len = (dx * dx + dy * dy).sqrt();
        if len <= 0.0 {
            return;
        }
        let nx = -dy / len * width * 0.5;
        let ny = dx / len * width * 0.5;
        self.push_quad(
            [
                [p1[0] - nx, p1[1] - ny],
                [p1[0] + nx, p1[1] + ny],
                [p2[0] + nx, p2[1] + ny],
                [p2[0] - nx, p2[1] - ny],
            ],
            color,
        );
    }

    /// Connected segments with round joints.
    pub fn polyline(&mut self, points: &[Point], width: f32, color: Color) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
        if points.len() > 2 {
            for &joint in &points[1..points.len() - 1] {
                self.circle(joint, width * 0.5, color);
            }
        }
    }

    pub fn rect(&mut self, min: Point, size: [f32; 2], color: Color) {
        let [x, y] = min;
        let [w, h] = size;
        self.push_quad([[x, y], [x + w, y], [x + w, y + h], [x, y + h]], color);
    }

    /// Rectangle outline whose stroke is centred on the edges.
    pub fn rect_outline(&mut self, min: Point, size: [f32; 2], width: f32, color: Color) {
        let [x, y] = min;
        let [w, h] = size;
        let half = width * 0.5;
        self.line([x - half, y], [x + w + half, y], width, color);
        self.line([x - half, y + h], [x + w + half, y + h], width, color);
        self.line([x, y], [x, y + h], width, color);
        self.line([x + w, y], [x + w, y + h], width, color);
    }

    pub fn circle(&mut self, center: Point, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let base = self.vertices.len() as u32;
        self.vertices.push(Vertex {
            position: center,
            color,
        });
        for i in 0..CIRCLE_SEGMENTS {
            let angle = i as f32 * TAU / CIRCLE_SEGMENTS as f32;
            self.vertices.push(Vertex {
                position: [
                    center[0] + radius * angle.cos(),
                    center[1] + radius * angle.sin(),
                ],
                color,
            });
        }
        for i in 0..CIRCLE_SEGMENTS {
            self.indices.extend_from_slice(&[
                base,
                base + 1 + i,
                base + 1 + (i + 1) % CIRCLE_SEGMENTS,
            ]);
        }
    }

    /// Circle outline; the stroke straddles `radius`.
    pub fn ring(&mut self, center: Point, radius: f32, width: f32, color: Color) {
        self.arc(center, radius, 0.0, TAU, width, color);
    }

    /// Arc from `start_angle` to `end_angle` (radians, clockwise on screen).
    pub fn arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Color,
    ) {
        let sweep = end_angle - start_angle;
        let segments = ((CIRCLE_SEGMENTS as f32 * sweep.abs() / TAU).ceil() as u32).max(1);
        let inner = (radius - width * 0.5).max(0.0);
        let outer = radius + width * 0.5;

        for i in 0..segments {
            let a1 = start_angle + sweep * i as f32 / segments as f32;
            let a2 = start_angle + sweep * (i + 1) as f32 / segments as f32;
            let (s1, c1) = a1.sin_cos();
            let (s2, c2) = a2.sin_cos();
            self.push_quad(
                [
                    [center[0] + inner * c1, center[1] + inner * s1],
                    [center[0] + outer * c1, center[1] + outer * s1],
                    [center[0] + outer * c2, center[1] + outer * s2],
                    [center[0] + inner * c2, center[1] + inner * s2],
                ],
                color,
            );
        }
    }

    /// Quadratic Bézier from `start` through `control` to `end`.
    pub fn quadratic(&mut self, start: Point, control: Point, end: Point, width: f32, color: Color) {
        let points: Vec<Point> = (0..=CURVE_SEGMENTS)
            .map(|i| quadratic_point(start, control, end, i as f32 / CURVE_SEGMENTS as f32))
            .collect();
        self.polyline(&points, width, color);
    }

    /// Two barbs pointing back from `tip`. `angle` is the direction of
    /// travel at the tip.
    pub fn arrow_head(&mut self, tip: Point, angle: f32, length: f32, width: f32, color: Color) {
        for barb in [angle - PI / 6.0, angle + PI / 6.0] {
            let end = [tip[0] - length * barb.cos(), tip[1] - length * barb.sin()];
            self.line(tip, end, width, color);
        }
        self.circle(tip, width * 0.5, color);
    }
}

pub fn quadratic_point(start: Point, control: Point, end: Point, t: f32) -> Point {
    let u = 1.0 - t;
    [
        u * u * start[0] + 2.0 * u * t * control[0] + t * t * end[0],
        u * u * start[1] + 2.0 * u * t * control[1] + t * t * end[1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_line_is_one_quad_and_zero_length_is_skipped() {
        let mut mesh = Mesh::new();
        mesh.line([0.0, 0.0], [10.0, 0.0], 4.0, WHITE);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[0].position, [0.0, -2.0]);
        assert_eq!(mesh.vertices[2].position, [10.0, 2.0]);

        mesh.line([5.0, 5.0], [5.0, 5.0], 4.0, WHITE);
        assert_eq!(mesh.vertices.len(), 4);
    }

    #[test]
    fn test_circle_is_a_fan() {
        let mut mesh = Mesh::new();
        mesh.circle([0.0, 0.0], 15.0, WHITE);
        assert_eq!(mesh.vertices.len(), CIRCLE_SEGMENTS as usize + 1);
        assert_eq!(mesh.triangle_count(), CIRCLE_SEGMENTS as usize);
        for vertex in &mesh.vertices[1..] {
            let [x, y] = vertex.position;
            assert!(((x * x + y * y).sqrt() - 15.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_extend_offsets_indices() {
        let mut a = Mesh::new();
        a.rect([0.0, 0.0], [1.0, 1.0], WHITE);
        let mut b = Mesh::new();
        b.rect([5.0, 5.0], [1.0, 1.0], WHITE);
        a.extend(&b);
        assert_eq!(a.vertices.len(), 8);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_translate_moves_every_vertex() {
        let mut mesh = Mesh::new();
        mesh.rect([0.0, 0.0], [2.0, 2.0], WHITE);
        mesh.translate([10.0, 20.0]);
        assert_eq!(mesh.vertices[0].position, [10.0, 20.0]);
        assert_eq!(mesh.vertices[2].position, [12.0, 22.0]);
    }

    #[test]
    fn test_quadratic_point_endpoints() {
        let start = [0.0, 0.0];
        let control = [5.0, -10.0];
        let end = [10.0, 0.0];
        assert_eq!(quadratic_point(start, control, end, 0.0), start);
        assert_eq!(quadratic_point(start, control, end, 1.0), end);
        assert_eq!(quadratic_point(start, control, end, 0.5), [5.0, -5.0]);
    }
}
