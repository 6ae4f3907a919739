use std::{fmt, sync::Arc};

use crate::foundation::{
    core::Size,
    error::{ShapecropError, ShapecropResult},
    math::premultiply_rgba8_in_place,
};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ShapecropResult<Self> {
        let bmp = Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        };
        bmp.validate()?;
        Ok(bmp)
    }

    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> ShapecropResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Uniform bitmap filled with a straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut px = rgba.to_vec();
        premultiply_rgba8_in_place(&mut px);
        let len = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Premultiplied pixel at `(x, y)`; callers stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[idx..idx + 4];
        [p[0], p[1], p[2], p[3]]
    }

    /// Reject bitmaps the compositor cannot sample from.
    pub fn validate(&self) -> ShapecropResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShapecropError::decode(format!(
                "bitmap has empty dimensions {}x{}",
                self.width, self.height
            )));
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ShapecropError::decode("bitmap size overflow"))?;
        if self.rgba8_premul.len() != expected {
            return Err(ShapecropError::decode(format!(
                "bitmap buffer is {} bytes, expected {expected}",
                self.rgba8_premul.len()
            )));
        }
        Ok(())
    }
}
