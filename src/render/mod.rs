//! CPU compositing of a photo inside a mask.

/// Mask layout and the two-pass composite.
pub mod compositor;
/// Owned RGBA8 render target with a scoped blend mode.
pub mod raster;
