//! Editor configuration loaded from JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{catalog::MaskEntry, ingest::DEFAULT_MAX_PREVIEW_DIM},
    export::orchestrator::ExportResolution,
    foundation::{
        core::Canvas,
        error::{ShapecropError, ShapecropResult},
    },
    render::raster::StencilChannel,
    session::state::DEFAULT_MASK_ID,
};

/// Settings for an [`crate::Editor`]. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Prefix of exported filenames.
    pub product_name: String,
    /// On-screen canvas the user interacts with; transforms are recorded in its pixels.
    pub preview_canvas: Canvas,
    /// Mask selected at session start; `None` starts with no mask.
    pub default_mask: Option<String>,
    /// Read mask resources from this directory instead of the built-in shapes.
    pub masks_dir: Option<PathBuf>,
    /// Replace the built-in catalog entries (paths relative to `masks_dir`).
    pub masks: Option<Vec<MaskEntry>>,
    pub stencil: StencilChannel,
    pub default_resolution: ExportResolution,
    /// Longest side of the downscaled preview bitmap.
    pub max_preview_dim: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            product_name: "shapecrop".to_string(),
            preview_canvas: Canvas {
                width: 400,
                height: 400,
            },
            default_mask: Some(DEFAULT_MASK_ID.to_string()),
            masks_dir: None,
            masks: None,
            stencil: StencilChannel::Alpha,
            default_resolution: ExportResolution::Medium,
            max_preview_dim: DEFAULT_MAX_PREVIEW_DIM,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> ShapecropResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ShapecropError::validation(format!("parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> ShapecropResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ShapecropResult<()> {
        if self.product_name.trim().is_empty() {
            return Err(ShapecropError::validation("product_name must be non-empty"));
        }
        Canvas::new(self.preview_canvas.width, self.preview_canvas.height)?;
        if self.max_preview_dim == 0 {
            return Err(ShapecropError::validation("max_preview_dim must be > 0"));
        }
        if self.masks.is_some() && self.masks_dir.is_none() {
            return Err(ShapecropError::validation("custom masks require masks_dir"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
