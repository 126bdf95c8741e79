use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::drawing::Color;
use crate::mesh::Mesh;

pub const GRASS_COLOR: Color = [0.173, 0.549, 0.235, 1.0];
pub const MARKING_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
pub const MARKING_WIDTH: f32 = 2.0;

const CENTER_CIRCLE_RADIUS: f32 = 60.0;
const SPOT_RADIUS: f32 = 3.0;
const PENALTY_AREA: [f32; 2] = [132.0, 324.0];
const GOAL_AREA: [f32; 2] = [44.0, 132.0];
const PENALTY_SPOT_DISTANCE: f32 = 88.0;
const CORNER_ARC_RADIUS: f32 = 10.0;

/// Grass and markings for a `size` surface with the touchlines `margin`
/// pixels in from the edge.
pub fn pitch_mesh(size: [f32; 2], margin: f32) -> Mesh {
    let [width, height] = size;
    let mut mesh = Mesh::new();
    mesh.rect([0.0, 0.0], size, GRASS_COLOR);

    let field_size = [width - 2.0 * margin, height - 2.0 * margin];
    mesh.rect_outline([margin, margin], field_size, MARKING_WIDTH, MARKING_COLOR);

    let center = [width / 2.0, height / 2.0];
    mesh.line(
        [center[0], margin],
        [center[0], height - margin],
        MARKING_WIDTH,
        MARKING_COLOR,
    );
    mesh.ring(center, CENTER_CIRCLE_RADIUS, MARKING_WIDTH, MARKING_COLOR);
    mesh.circle(center, SPOT_RADIUS, MARKING_COLOR);

    for (area, spot) in [(PENALTY_AREA, true), (GOAL_AREA, false)] {
        let top = (height - area[1]) / 2.0;
        mesh.rect_outline([margin, top], area, MARKING_WIDTH, MARKING_COLOR);
        mesh.rect_outline(
            [width - margin - area[0], top],
            area,
            MARKING_WIDTH,
            MARKING_COLOR,
        );
        if spot {
            mesh.circle(
                [margin + PENALTY_SPOT_DISTANCE, center[1]],
                SPOT_RADIUS,
                MARKING_COLOR,
            );
            mesh.circle(
                [width - margin - PENALTY_SPOT_DISTANCE, center[1]],
                SPOT_RADIUS,
                MARKING_COLOR,
            );
        }
    }

    let corners = [
        ([margin, margin], 0.0),
        ([width - margin, margin], FRAC_PI_2),
        ([width - margin, height - margin], PI),
        ([margin, height - margin], PI + FRAC_PI_2),
    ];
    for (corner, start) in corners {
        mesh.arc(
            corner,
            CORNER_ARC_RADIUS,
            start,
            (start + FRAC_PI_2).min(TAU),
            MARKING_WIDTH,
            MARKING_COLOR,
        );
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grass_covers_surface_first() {
        let mesh = pitch_mesh([700.0, 490.0], 30.0);
        let grass: Vec<_> = mesh.vertices[..4].iter().map(|v| v.position).collect();
        assert_eq!(grass, vec![[0.0, 0.0], [700.0, 0.0], [700.0, 490.0], [0.0, 490.0]]);
        assert!(mesh.vertices[..4].iter().all(|v| v.color == GRASS_COLOR));
    }

    #[test]
    fn test_markings_stay_inside_surface() {
        let mesh = pitch_mesh([800.0, 560.0], 30.0);
        for vertex in &mesh.vertices {
            let [x, y] = vertex.position;
            assert!((0.0..=800.0).contains(&x), "x = {x}");
            assert!((0.0..=560.0).contains(&y), "y = {y}");
        }
        assert!(mesh.vertices[4..].iter().all(|v| v.color == MARKING_COLOR));
    }
}
