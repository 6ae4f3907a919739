//! Masked "cover" composite of a source photo inside a mask silhouette.
//!
//! The same routine renders the live preview and the exported file. Output depends only on the
//! inputs, so two renders at different sizes frame the photo identically once the transform's
//! translate has been rescaled with [`Transform::rescaled`].

use crate::{
    assets::bitmap::Bitmap,
    foundation::{
        core::{Canvas, Point, Rect, Size, Transform},
        error::{ShapecropError, ShapecropResult},
    },
    render::raster::{BlendMode, Raster, StencilChannel},
};

/// Fraction of the canvas reserved as margin on each side of the mask.
pub const MASK_MARGIN: f64 = 0.02;

/// Where the mask and the photo land on a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeLayout {
    /// Mask rectangle, contain-fit into the canvas minus margins and centered.
    pub mask_rect: Rect,
    /// Photo rectangle before the user transform: cover-fit to `mask_rect`, same center.
    pub base_image_rect: Rect,
    /// Photo rectangle after scale and translate.
    pub image_rect: Rect,
}

impl CompositeLayout {
    pub fn compute(canvas: Canvas, mask: Size, image: Size, transform: Transform) -> Self {
        let canvas_size = canvas.size();
        let available = Size::new(
            canvas_size.width * (1.0 - 2.0 * MASK_MARGIN),
            canvas_size.height * (1.0 - 2.0 * MASK_MARGIN),
        );

        let mask_size = contain(mask, available);
        let canvas_center = Point::new(canvas_size.width / 2.0, canvas_size.height / 2.0);
        let mask_rect = Rect::from_center_size(canvas_center, mask_size);

        let base_size = cover(image, mask_size);
        let mask_center = mask_rect.center();
        let base_image_rect = Rect::from_center_size(mask_center, base_size);

        let scaled = Size::new(
            base_size.width * transform.scale,
            base_size.height * transform.scale,
        );
        let image_rect = Rect::from_center_size(mask_center + transform.translation(), scaled);

        Self {
            mask_rect,
            base_image_rect,
            image_rect,
        }
    }
}

/// Largest size with `item`'s aspect ratio that fits inside `bounds`.
pub fn contain(item: Size, bounds: Size) -> Size {
    let item_aspect = item.width / item.height;
    let bounds_aspect = bounds.width / bounds.height;
    if item_aspect > bounds_aspect {
        Size::new(bounds.width, bounds.width / item_aspect)
    } else {
        Size::new(bounds.height * item_aspect, bounds.height)
    }
}

/// Smallest size with `item`'s aspect ratio that fully covers `bounds`.
pub fn cover(item: Size, bounds: Size) -> Size {
    let item_aspect = item.width / item.height;
    let bounds_aspect = bounds.width / bounds.height;
    if item_aspect > bounds_aspect {
        Size::new(bounds.height * item_aspect, bounds.height)
    } else {
        Size::new(bounds.width, bounds.width / item_aspect)
    }
}

/// Render `source` clipped by `mask` into `raster`, replacing its previous contents.
///
/// Inputs are validated before anything is drawn, so an error leaves the raster untouched.
#[tracing::instrument(skip(raster, source, mask), fields(canvas = ?raster.canvas()))]
pub fn composite_into(
    raster: &mut Raster,
    source: &Bitmap,
    mask: &Bitmap,
    transform: Transform,
    stencil: StencilChannel,
) -> ShapecropResult<CompositeLayout> {
    source.validate()?;
    mask.validate()?;
    if !transform.is_usable() {
        return Err(ShapecropError::validation(format!(
            "transform is not finite: {transform:?}"
        )));
    }
    let transform = transform.clamped();
    let layout = CompositeLayout::compute(raster.canvas(), mask.size(), source.size(), transform);

    raster.clear();
    raster.draw_bitmap(source, layout.image_rect)?;
    raster.with_blend_mode(BlendMode::DestinationIn(stencil), |r| {
        r.draw_bitmap(mask, layout.mask_rect)
    })?;

    tracing::debug!(
        mask_rect = ?layout.mask_rect,
        image_rect = ?layout.image_rect,
        "composited"
    );
    Ok(layout)
}

/// Allocate a raster of `canvas` size and composite into it.
pub fn composite(
    source: &Bitmap,
    mask: &Bitmap,
    transform: Transform,
    canvas: Canvas,
    stencil: StencilChannel,
) -> ShapecropResult<Raster> {
    let mut raster = Raster::new(canvas)?;
    composite_into(&mut raster, source, mask, transform, stencil)?;
    Ok(raster)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
