use image::{
    ExtendedColorType, ImageEncoder,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::{
    foundation::error::{ShapecropError, ShapecropResult},
    render::raster::Raster,
};

/// Encode a raster as a straight-alpha RGBA8 PNG with the strongest compression.
pub fn encode_png(raster: &Raster) -> ShapecropResult<Vec<u8>> {
    let straight = raster.to_straight_rgba8();
    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive)
        .write_image(
            &straight,
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ShapecropError::export(format!("encode png: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
