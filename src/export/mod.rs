//! Export at a fixed square resolution, PNG encoding and delivery.

/// Share-or-download delivery of exported files.
pub mod delivery;
/// Export resolutions, filenames and the export pipeline.
pub mod orchestrator;
/// PNG encoding of rasters.
pub mod png;
