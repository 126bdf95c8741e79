//! CPU rasteriser for export. Fills the same triangle meshes the GPU draws,
//! sampling at pixel centres with source-over blending.

use image::{Rgba, RgbaImage};

use crate::mesh::Mesh;
use crate::vertex::Vertex;

pub fn rasterize(mesh: &Mesh, width: u32, height: u32) -> RgbaImage {
    // Premultiplied RGBA accumulation buffer.
    let mut target = vec![[0.0f32; 4]; width as usize * height as usize];

    for triangle in mesh.indices.chunks_exact(3) {
        let corners = (
            mesh.vertices.get(triangle[0] as usize),
            mesh.vertices.get(triangle[1] as usize),
            mesh.vertices.get(triangle[2] as usize),
        );
        if let (Some(a), Some(b), Some(c)) = corners {
            fill_triangle(&mut target, width, height, a, b, c);
        }
    }

    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = target[y as usize * width as usize + x as usize];
        if a <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([
            to_byte(r / a),
            to_byte(g / a),
            to_byte(b / a),
            to_byte(a),
        ])
    })
}

fn fill_triangle(target: &mut [[f32; 4]], width: u32, height: u32, a: &Vertex, b: &Vertex, c: &Vertex) {
    let area = edge(a.position, b.position, c.position);
    if area.abs() < f32::EPSILON {
        return;
    }
    // Counter-clockwise in the edge-function sense, so shared edges are
    // walked in opposite directions by neighbouring triangles.
    let (a, b, c, area) = if area < 0.0 {
        (a, c, b, -area)
    } else {
        (a, b, c, area)
    };

    let xs = [a.position[0], b.position[0], c.position[0]];
    let ys = [a.position[1], b.position[1], c.position[1]];
    let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let max_x = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max).ceil();
    let max_y = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max).ceil();
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let max_x = (max_x as u32).min(width);
    let max_y = (max_y as u32).min(height);

    for py in min_y..max_y {
        for px in min_x..max_x {
            let p = [px as f32 + 0.5, py as f32 + 0.5];
            let w0 = edge(b.position, c.position, p);
            let w1 = edge(c.position, a.position, p);
            let w2 = edge(a.position, b.position, p);
            if !(covers(w0, b.position, c.position)
                && covers(w1, c.position, a.position)
                && covers(w2, a.position, b.position))
            {
                continue;
            }

            let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
            let mut src = [0.0f32; 4];
            for (channel, value) in src.iter_mut().enumerate() {
                *value = l0 * a.color[channel] + l1 * b.color[channel] + l2 * c.color[channel];
            }
            let alpha = src[3].clamp(0.0, 1.0);
            let dst = &mut target[py as usize * width as usize + px as usize];
            for channel in 0..3 {
                dst[channel] = src[channel].clamp(0.0, 1.0) * alpha + dst[channel] * (1.0 - alpha);
            }
            dst[3] = alpha + dst[3] * (1.0 - alpha);
        }
    }
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Inside test with a tie-break so a pixel centre on a shared edge belongs
/// to exactly one of the two triangles.
fn covers(w: f32, from: [f32; 2], to: [f32; 2]) -> bool {
    if w != 0.0 {
        return w > 0.0;
    }
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    dy > 0.0 || (dy == 0.0 && dx < 0.0)
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_rect_fills_exact_pixels() {
        let mut mesh = Mesh::new();
        mesh.rect([2.0, 2.0], [4.0, 3.0], [1.0, 0.0, 0.0, 1.0]);
        let image = rasterize(&mesh, 10, 10);

        assert_eq!(image.get_pixel(2, 2), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(5, 4), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(6, 4), &Rgba([0, 0, 0, 0]));
        assert_eq!(image.get_pixel(5, 5), &Rgba([0, 0, 0, 0]));
        assert_eq!(image.get_pixel(1, 2), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_translucent_quad_blends_once_per_pixel() {
        let mut mesh = Mesh::new();
        mesh.rect([0.0, 0.0], [8.0, 8.0], [0.0, 0.0, 0.0, 0.5]);
        let image = rasterize(&mesh, 8, 8);
        for pixel in image.pixels() {
            assert_eq!(pixel[3], 128);
        }
    }

    #[test]
    fn test_source_over_blending() {
        let mut mesh = Mesh::new();
        mesh.rect([0.0, 0.0], [4.0, 4.0], [1.0, 1.0, 1.0, 1.0]);
        mesh.rect([0.0, 0.0], [4.0, 4.0], [0.0, 0.0, 0.0, 0.5]);
        let image = rasterize(&mesh, 4, 4);
        assert_eq!(image.get_pixel(1, 1), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_geometry_outside_image_is_clipped() {
        let mut mesh = Mesh::new();
        mesh.rect([-50.0, -50.0], [200.0, 200.0], [0.0, 1.0, 0.0, 1.0]);
        mesh.circle([500.0, 500.0], 10.0, [1.0, 0.0, 0.0, 1.0]);
        let image = rasterize(&mesh, 5, 5);
        assert!(image.pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }
}
