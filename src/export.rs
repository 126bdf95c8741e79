use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::board::BoardState;
use crate::raster::rasterize;
use crate::scene::board_mesh;
use crate::text_renderer::LabelFont;

pub const EXPORT_FILE_NAME: &str = "tactical-board.png";

/// Renders the board alone (no toolbar or dialog) as PNG bytes. `None` when
/// the surface has no area.
pub fn render_png(board: &BoardState, font: Option<&LabelFont>) -> Result<Option<Vec<u8>>> {
    let width = board.surface_size[0].floor();
    let height = board.surface_size[1].floor();
    if width < 1.0 || height < 1.0 {
        return Ok(None);
    }

    let mesh = board_mesh(board, font);
    let image = rasterize(&mesh, width as u32, height as u32);
    encode_png(&image).map(Some)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .context("failed to encode PNG")?;
    Ok(bytes)
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use anyhow::anyhow;
        use wasm_bindgen::JsCast;

        /// Offers the PNG as a browser download.
        pub fn deliver(bytes: &[u8], _export_dir: Option<&std::path::Path>) -> Result<String> {
            let js_err = |e: wasm_bindgen::JsValue| anyhow!("{e:?}");

            let parts = js_sys::Array::new();
            parts.push(&js_sys::Uint8Array::from(bytes));
            let options = web_sys::BlobPropertyBag::new();
            options.set_type("image/png");
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                .map_err(js_err)?;
            let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

            let document = web_sys::window()
                .and_then(|window| window.document())
                .context("no document")?;
            let anchor: web_sys::HtmlAnchorElement = document
                .create_element("a")
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| anyhow!("created element is not an anchor"))?;
            anchor.set_href(&url);
            anchor.set_download(EXPORT_FILE_NAME);
            anchor.click();
            web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
            Ok(EXPORT_FILE_NAME.to_string())
        }
    } else {
        use std::path::Path;

        /// Writes the PNG into `export_dir` (working directory by default).
        pub fn deliver(bytes: &[u8], export_dir: Option<&Path>) -> Result<String> {
            let dir = export_dir.unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = dir.join(EXPORT_FILE_NAME);
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(path.display().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{FontSettings, FontStyle, TeamColors};
    use crate::drawing::DrawingElement;
    use crate::pitch::GRASS_COLOR;
    use tempfile::tempdir;

    fn board(size: [f32; 2]) -> BoardState {
        BoardState::new(
            size,
            TeamColors {
                home: [0.0, 0.0, 1.0, 1.0],
                away: [1.0, 0.0, 0.0, 1.0],
            },
            FontSettings {
                size: 14.0,
                style: FontStyle::Normal,
            },
        )
    }

    #[test]
    fn test_png_has_board_size_and_content() {
        let mut board = board([200.0, 120.0]);
        board.elements.append(DrawingElement::Ball { position: [100.0, 60.0] });

        let bytes = render_png(&board, None).unwrap().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (200, 120));

        let grass = decoded.get_pixel(5, 5);
        assert_eq!(grass[1], (GRASS_COLOR[1] * 255.0).round() as u8);
        assert_eq!(decoded.get_pixel(100, 60).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_area_surface_exports_nothing() {
        let board = board([0.0, 300.0]);
        assert!(render_png(&board, None).unwrap().is_none());
    }

    #[test]
    fn test_deliver_writes_named_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("exports");
        let bytes = encode_png(&RgbaImage::new(2, 2)).unwrap();

        let written = deliver(&bytes, Some(&target)).unwrap();
        let path = target.join(EXPORT_FILE_NAME);
        assert_eq!(written, path.display().to_string());
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
