//! Decoded images, the mask catalog and source ingestion.
//!
//! Bitmaps are premultiplied RGBA8 end to end; straight alpha only appears at the PNG boundary.

/// Premultiplied RGBA8 bitmaps.
pub mod bitmap;
/// Built-in and directory-backed mask catalog.
pub mod catalog;
/// Raster and SVG decoding.
pub mod decode;
/// Validation and preview downscaling of user photos.
pub mod ingest;
