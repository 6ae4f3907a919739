//! Acceptance of user-provided source photos.

use std::sync::Arc;

use crate::{
    assets::{bitmap::Bitmap, decode::bitmap_from_dynamic},
    foundation::error::{ShapecropError, ShapecropResult},
};

/// Default longest side of the interactive preview bitmap.
pub const DEFAULT_MAX_PREVIEW_DIM: u32 = 2000;

/// A validated source photo.
///
/// `original` is kept verbatim so export can decode it again at full resolution; `preview` is the
/// possibly downscaled bitmap used for on-screen compositing.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub original: Arc<[u8]>,
    pub preview: Arc<Bitmap>,
    pub full_width: u32,
    pub full_height: u32,
}

/// Validate and decode a user-provided file.
///
/// `declared_mime` is the type reported by the picker; anything outside `image/*` is rejected before
/// decoding.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn ingest_source(
    bytes: Vec<u8>,
    declared_mime: &str,
    max_preview_dim: u32,
) -> ShapecropResult<SourceImage> {
    if !declared_mime.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(ShapecropError::validation(format!(
            "please select an image file (got '{declared_mime}')"
        )));
    }
    if max_preview_dim == 0 {
        return Err(ShapecropError::validation("max preview dimension must be > 0"));
    }

    let dyn_img = image::load_from_memory(&bytes)
        .map_err(|e| ShapecropError::decode(format!("decode source image: {e}")))?;
    let (full_width, full_height) = (dyn_img.width(), dyn_img.height());

    let preview = if full_width.max(full_height) > max_preview_dim {
        tracing::debug!(full_width, full_height, max_preview_dim, "downscaling preview");
        // `resize` fits within the box and preserves aspect ratio.
        dyn_img.resize(
            max_preview_dim,
            max_preview_dim,
            image::imageops::FilterType::Triangle,
        )
    } else {
        dyn_img
    };

    Ok(SourceImage {
        original: Arc::from(bytes),
        preview: Arc::new(bitmap_from_dynamic(preview)?),
        full_width,
        full_height,
    })
}

/// Guess a MIME type from a file extension, for callers reading from disk.
pub fn mime_from_extension(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/ingest.rs"]
mod tests;
