//! shapecrop clips a photo to a decorative mask shape and exports the result as PNG.
//!
//! The engine is split into small, mostly pure pieces:
//!
//! 1. **Session**: `SessionState + Action -> SessionState` reducer with bounded undo/redo history
//! 2. **Gestures**: pointer/touch/wheel input -> `SetTransform` actions (pan, pinch, wheel zoom)
//! 3. **Compositor**: `(source, mask, transform, canvas) -> Raster` (cover-fit, then destination-in)
//! 4. **Export**: fresh full-resolution decode, composite at 512/1024/2048, PNG encode, delivery
//!
//! [`Editor`] owns one session and wires these together the way an interactive front-end would.
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same inputs composite to the same pixels at any resolution, once the
//!   transform's translate is rescaled with [`Transform::rescaled`].
//! - **Premultiplied RGBA8** internally; exported PNGs carry straight alpha.
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod editor;
pub mod export;
pub mod foundation;
pub mod gesture;
pub mod render;
pub mod session;

pub use assets::bitmap::Bitmap;
pub use assets::catalog::{MaskCatalog, MaskEntry};
pub use assets::decode::{decode_any, decode_image, parse_svg, rasterize_svg};
pub use assets::ingest::{SourceImage, ingest_source, mime_from_extension};
pub use config::EditorConfig;
pub use editor::Editor;
pub use export::delivery::{Delivered, Delivery, DirectoryDownload, deliver};
pub use export::orchestrator::{
    ExportJob, ExportResolution, ExportedPng, Exporter, export_filename,
};
pub use export::png::encode_png;
pub use foundation::core::{Canvas, Point, Rect, Size, Transform, Vec2};
pub use foundation::error::{ShapecropError, ShapecropResult};
pub use gesture::controller::{GestureController, GestureInput, GestureState};
pub use render::compositor::{CompositeLayout, composite, composite_into};
pub use render::raster::{BlendMode, Raster, StencilChannel};
pub use session::history::TransformHistory;
pub use session::shortcuts::{NudgeDir, Shortcut};
pub use session::state::{Action, SessionState, Store};
