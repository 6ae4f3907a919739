use anyhow::Context;

use crate::{
    assets::bitmap::Bitmap,
    foundation::error::{ShapecropError, ShapecropResult},
};

/// Largest side a rasterized SVG mask may have.
const MAX_SVG_DIM: u32 = 16_384;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ShapecropResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ShapecropError::decode(format!("decode image from memory: {e}")))?;
    bitmap_from_dynamic(dyn_img)
}

pub(crate) fn bitmap_from_dynamic(dyn_img: image::DynamicImage) -> ShapecropResult<Bitmap> {
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_straight(width, height, rgba.into_raw())
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> ShapecropResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| ShapecropError::decode(format!("parse svg tree: {e}")))
}

/// Rasterize an SVG so its longest side is `longest_side` pixels, preserving aspect ratio.
pub fn rasterize_svg(tree: &usvg::Tree, longest_side: u32) -> ShapecropResult<Bitmap> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return Err(ShapecropError::decode("svg has invalid width/height"));
    }

    let longest_side = longest_side.clamp(1, MAX_SVG_DIM);
    let k = longest_side as f32 / w.max(h);
    let px_w = ((w * k).round() as u32).max(1);
    let px_h = ((h * k).round() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(px_w, px_h)
        .ok_or_else(|| ShapecropError::decode("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(px_w as f32 / w, px_h as f32 / h);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Bitmap::from_premul(px_w, px_h, pixmap.take())
}

/// Decode either an SVG document or a raster image.
///
/// SVGs are rasterized at `svg_longest_side`; raster images keep their native size.
pub fn decode_any(bytes: &[u8], svg_longest_side: u32) -> ShapecropResult<Bitmap> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        return rasterize_svg(&tree, svg_longest_side);
    }
    decode_image(bytes)
}

pub(crate) fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Read a file from disk and decode it with [`decode_any`].
pub fn decode_path(path: &std::path::Path, svg_longest_side: u32) -> ShapecropResult<Bitmap> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_any(&bytes, svg_longest_side)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
