//! Player labels.
//!
//! Glyphs are rasterised with ab_glyph and emitted into the scene mesh as
//! horizontal runs of one-pixel-high quads whose alpha carries the glyph
//! coverage, so labels go through the same pipeline as every other shape.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, OutlinedGlyph, PxScale, ScaleFont};
use anyhow::{anyhow, Context, Result};

use crate::board::FontSettings;
use crate::drawing::{Color, Point};
use crate::mesh::Mesh;

const SYSTEM_FONTS: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const ITALIC_SHEAR: f32 = 0.2;
const BOLD_OFFSET: f32 = 1.0;
const COVERAGE_LEVELS: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Text is vertically centred on the anchor.
    Middle,
    /// Top of the ascender sits on the anchor.
    Top,
}

pub struct LabelFont {
    font: FontVec,
}

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| anyhow!("invalid font data: {e}"))?;
        Ok(Self { font })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_bytes(data)
    }

    /// The configured font if it loads, else the first usable system font.
    pub fn locate(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::from_file(path) {
                Ok(font) => {
                    log::info!("label font: {}", path.display());
                    return Some(font);
                }
                Err(e) => log::warn!("{e:#}"),
            }
        }

        let found = SYSTEM_FONTS.iter().map(Path::new).find_map(|path| {
            let font = Self::from_file(path).ok()?;
            log::info!("label font: {}", path.display());
            Some(font)
        });
        if found.is_none() {
            log::warn!("no usable font found, player labels are hidden");
        }
        found
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str, settings: FontSettings) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(settings.size));
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        if settings.style.is_bold() && !text.is_empty() {
            width += BOLD_OFFSET;
        }
        width
    }

    /// Draws `text` horizontally centred on `anchor`.
    pub fn draw(
        &self,
        mesh: &mut Mesh,
        text: &str,
        anchor: Point,
        vertical: VerticalAnchor,
        settings: FontSettings,
        color: Color,
    ) {
        let scale = PxScale::from(settings.size);
        let scaled = self.font.as_scaled(scale);
        let baseline = match vertical {
            VerticalAnchor::Middle => anchor[1] + (scaled.ascent() + scaled.descent()) / 2.0,
            VerticalAnchor::Top => anchor[1] + scaled.ascent(),
        };
        let shear = if settings.style.is_italic() {
            ITALIC_SHEAR
        } else {
            0.0
        };
        let passes: &[f32] = if settings.style.is_bold() {
            &[0.0, BOLD_OFFSET]
        } else {
            &[0.0]
        };

        let mut pen_x = anchor[0] - self.measure(text, settings) / 2.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                pen_x += scaled.kern(prev, id);
            }
            for &dx in passes {
                let glyph = id.with_scale_and_position(scale, point(pen_x + dx, baseline));
                if let Some(outlined) = self.font.outline_glyph(glyph) {
                    emit_coverage(mesh, &outlined, baseline, shear, color);
                }
            }
            pen_x += scaled.h_advance(id);
            prev = Some(id);
        }
    }
}

fn emit_coverage(mesh: &mut Mesh, outlined: &OutlinedGlyph, baseline: f32, shear: f32, color: Color) {
    let bounds = outlined.px_bounds();
    let width = bounds.width() as usize;
    let height = bounds.height() as usize;
    if width == 0 || height == 0 {
        return;
    }

    let mut coverage = vec![0.0f32; width * height];
    outlined.draw(|x, y, c| {
        if let Some(slot) = coverage.get_mut(y as usize * width + x as usize) {
            *slot = c;
        }
    });

    for row in 0..height {
        let y = bounds.min.y + row as f32;
        let shift = shear * (baseline - (y + 0.5));
        let cells = &coverage[row * width..(row + 1) * width];

        let mut col = 0;
        while col < width {
            let level = quantize(cells[col]);
            if level <= 0.0 {
                col += 1;
                continue;
            }
            let start = col;
            while col < width && quantize(cells[col]) == level {
                col += 1;
            }
            mesh.rect(
                [bounds.min.x + start as f32 + shift, y],
                [(col - start) as f32, 1.0],
                [color[0], color[1], color[2], color[3] * level],
            );
        }
    }
}

/// Rounds glyph coverage to a few levels so neighbouring pixels merge into
/// longer runs.
fn quantize(coverage: f32) -> f32 {
    (coverage.clamp(0.0, 1.0) * COVERAGE_LEVELS).round() / COVERAGE_LEVELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_bytes_are_rejected() {
        assert!(LabelFont::from_bytes(vec![0, 1, 2, 3]).is_err());
        assert!(LabelFont::from_file(Path::new("/nonexistent/font.ttf")).is_err());
    }

    #[test]
    fn test_quantize_levels() {
        assert_eq!(quantize(0.0), 0.0);
        assert_eq!(quantize(0.02), 0.0);
        assert_eq!(quantize(1.3), 1.0);
        assert_eq!(quantize(0.5), 0.5);
    }
}
