use resvg::tiny_skia::{self, FilterQuality, Pixmap, PixmapPaint, PixmapRef};

use crate::{
    assets::bitmap::Bitmap,
    foundation::{
        core::{Canvas, Rect},
        error::{ShapecropError, ShapecropResult},
    },
};

/// Largest raster side we are willing to allocate.
pub const MAX_RASTER_DIM: u32 = 16_384;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Which channel of a stencil bitmap supplies coverage for destination-in draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StencilChannel {
    #[default]
    Alpha,
    /// Un-premultiplied red read as alpha; matches masks authored as white-on-black.
    Red,
}

/// How subsequent draws combine with existing pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    SourceOver,
    /// Keep destination pixels only where the drawn bitmap covers them.
    DestinationIn(StencilChannel),
}

/// A premultiplied RGBA8 render target backed by a `tiny-skia` pixmap, with a current blend mode.
#[derive(Clone)]
pub struct Raster {
    pixmap: Pixmap,
    blend: BlendMode,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("blend", &self.blend)
            .finish_non_exhaustive()
    }
}

impl Raster {
    pub fn new(canvas: Canvas) -> ShapecropResult<Self> {
        let Canvas { width, height } = canvas;
        if width == 0 || height == 0 {
            return Err(ShapecropError::rendering_unavailable(format!(
                "cannot create a {width}x{height} raster"
            )));
        }
        if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
            return Err(ShapecropError::rendering_unavailable(format!(
                "raster size too large: {width}x{height} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
            )));
        }
        Ok(Self {
            pixmap: alloc_pixmap(width, height)?,
            blend: BlendMode::SourceOver,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let idx = ((y as usize) * (self.width() as usize) + (x as usize)) * 4;
        let d = self.pixmap.data();
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Run `f` with `mode` active, restoring the previous mode afterwards.
    pub fn with_blend_mode<R>(&mut self, mode: BlendMode, f: impl FnOnce(&mut Self) -> R) -> R {
        let prev = std::mem::replace(&mut self.blend, mode);
        let out = f(self);
        self.blend = prev;
        out
    }

    /// Draw `bitmap` stretched into `dest` using the current blend mode, with bilinear filtering.
    ///
    /// Destination-in affects the whole raster: pixels outside `dest` see zero coverage and become
    /// transparent.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect) -> ShapecropResult<()> {
        bitmap.validate()?;
        if !(dest.width() > 0.0 && dest.height() > 0.0) {
            return Err(ShapecropError::rendering_unavailable(format!(
                "draw rectangle must have positive area, got {dest:?}"
            )));
        }
        let xform = tiny_skia::Transform::from_row(
            (dest.width() / f64::from(bitmap.width)) as f32,
            0.0,
            0.0,
            (dest.height() / f64::from(bitmap.height)) as f32,
            dest.x0 as f32,
            dest.y0 as f32,
        );

        match self.blend {
            BlendMode::SourceOver => {
                let src = pixmap_ref(bitmap)?;
                self.pixmap.draw_pixmap(
                    0,
                    0,
                    src,
                    &paint(tiny_skia::BlendMode::SourceOver, FilterQuality::Bilinear),
                    xform,
                    None,
                );
            }
            BlendMode::DestinationIn(channel) => {
                let red_stencil;
                let stencil = match channel {
                    StencilChannel::Alpha => pixmap_ref(bitmap)?,
                    StencilChannel::Red => {
                        red_stencil = red_as_alpha(bitmap)?;
                        red_stencil.as_ref()
                    }
                };

                // Lay the stencil out on a transparent canvas-sized layer first, so the
                // destination-in pass covers every pixel of the raster.
                let mut coverage = alloc_pixmap(self.width(), self.height())?;
                coverage.draw_pixmap(
                    0,
                    0,
                    stencil,
                    &paint(tiny_skia::BlendMode::SourceOver, FilterQuality::Bilinear),
                    xform,
                    None,
                );
                self.pixmap.draw_pixmap(
                    0,
                    0,
                    coverage.as_ref(),
                    &paint(tiny_skia::BlendMode::DestinationIn, FilterQuality::Nearest),
                    tiny_skia::Transform::identity(),
                    None,
                );
            }
        }
        Ok(())
    }

    /// Straight-alpha RGBA8 copy suitable for encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }
}

fn alloc_pixmap(width: u32, height: u32) -> ShapecropResult<Pixmap> {
    Pixmap::new(width, height).ok_or_else(|| {
        ShapecropError::rendering_unavailable(format!("failed to allocate {width}x{height} pixmap"))
    })
}

fn paint(blend_mode: tiny_skia::BlendMode, quality: FilterQuality) -> PixmapPaint {
    PixmapPaint {
        opacity: 1.0,
        blend_mode,
        quality,
    }
}

fn pixmap_ref(bitmap: &Bitmap) -> ShapecropResult<PixmapRef<'_>> {
    PixmapRef::from_bytes(&bitmap.rgba8_premul, bitmap.width, bitmap.height)
        .ok_or_else(|| ShapecropError::decode("bitmap buffer cannot be sampled"))
}

/// Stencil whose alpha is the bitmap's un-premultiplied red channel.
fn red_as_alpha(bitmap: &Bitmap) -> ShapecropResult<Pixmap> {
    let src = pixmap_ref(bitmap)?;
    let mut out = alloc_pixmap(bitmap.width, bitmap.height)?;
    for (dst, p) in out.data_mut().chunks_exact_mut(4).zip(src.pixels()) {
        dst.copy_from_slice(&[0, 0, 0, p.demultiply().red()]);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
