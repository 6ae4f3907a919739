use crate::foundation::error::{ShapecropError, ShapecropResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ShapecropResult<Self> {
        if width == 0 || height == 0 {
            return Err(ShapecropError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn square(side: u32) -> ShapecropResult<Self> {
        Self::new(side, side)
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn pixel_count(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// User-controlled placement of the source image inside the mask.
///
/// `translate_x`/`translate_y` are offsets of the image center from the mask center, expressed in
/// pixels of the canvas the user interacts with. They are not resolution independent; use
/// [`Transform::rescaled`] before rendering at another size. `scale` is resolution independent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const MIN_SCALE: f64 = 0.1;
    pub const MAX_SCALE: f64 = 3.0;

    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    pub fn clamp_scale(scale: f64) -> f64 {
        scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE)
    }

    /// Copy with `scale` clamped into `[MIN_SCALE, MAX_SCALE]`.
    pub fn clamped(self) -> Self {
        Self {
            scale: Self::clamp_scale(self.scale),
            ..self
        }
    }

    /// NaN anywhere, or an infinite translate, makes a transform unusable.
    pub fn is_usable(self) -> bool {
        !self.scale.is_nan() && self.translate_x.is_finite() && self.translate_y.is_finite()
    }

    pub fn translation(self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub fn translated_by(self, delta: Vec2) -> Self {
        Self {
            translate_x: self.translate_x + delta.x,
            translate_y: self.translate_y + delta.y,
            ..self
        }
    }

    /// Re-express translate in the pixel space of `to`, given it was recorded on `from`.
    pub fn rescaled(self, from: Canvas, to: Canvas) -> Self {
        let sx = f64::from(to.width) / f64::from(from.width);
        let sy = f64::from(to.height) / f64::from(from.height);
        Self {
            scale: self.scale,
            translate_x: self.translate_x * sx,
            translate_y: self.translate_y * sy,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
