//! Full-resolution export: fresh decode, composite, PNG encode.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    assets::decode::{decode_any, decode_image},
    foundation::{
        core::{Canvas, Transform},
        error::{ShapecropError, ShapecropResult},
    },
    export::png::encode_png,
    render::{compositor::composite, raster::StencilChannel},
};

/// Square output sizes offered to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ExportResolution {
    Small,
    #[default]
    Medium,
    Large,
}

impl ExportResolution {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn px(self) -> u32 {
        match self {
            Self::Small => 512,
            Self::Medium => 1024,
            Self::Large => 2048,
        }
    }

    pub fn canvas(self) -> Canvas {
        let side = self.px();
        Canvas {
            width: side,
            height: side,
        }
    }
}

impl TryFrom<u32> for ExportResolution {
    type Error = ShapecropError;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.px() == px)
            .ok_or_else(|| {
                ShapecropError::validation(format!(
                    "export size must be one of 512, 1024, 2048 (got {px})"
                ))
            })
    }
}

impl From<ExportResolution> for u32 {
    fn from(r: ExportResolution) -> Self {
        r.px()
    }
}

impl std::str::FromStr for ExportResolution {
    type Err = ShapecropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let px: u32 = s
            .trim()
            .trim_end_matches("px")
            .parse()
            .map_err(|_| ShapecropError::validation(format!("invalid export size '{s}'")))?;
        Self::try_from(px)
    }
}

impl std::fmt::Display for ExportResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let px = self.px();
        write!(f, "{px}x{px}")
    }
}

/// An encoded export ready for delivery.
#[derive(Clone, Debug)]
pub struct ExportedPng {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub resolution: ExportResolution,
}

/// Inputs of one export. Images are passed encoded so they are decoded at full resolution.
#[derive(Clone, Copy, Debug)]
pub struct ExportJob<'a> {
    /// Original source file bytes (not the downscaled preview).
    pub source: &'a [u8],
    /// Encoded mask resource; SVG masks are rasterized at the export resolution.
    pub mask: &'a [u8],
    /// Transform as recorded on the preview canvas.
    pub transform: Transform,
    /// Preview canvas the transform's translate is expressed in.
    pub preview: Canvas,
    pub resolution: ExportResolution,
    pub stencil: StencilChannel,
}

/// `{product}-{N}x{N}-{epoch_ms}.png`
pub fn export_filename(product_name: &str, resolution: ExportResolution, epoch_ms: u128) -> String {
    format!("{product_name}-{resolution}-{epoch_ms}.png")
}

/// Produces PNG files named after a product.
#[derive(Clone, Debug)]
pub struct Exporter {
    product_name: String,
}

impl Exporter {
    pub fn new(product_name: impl Into<String>) -> ShapecropResult<Self> {
        let product_name = product_name.into();
        if product_name.is_empty() || product_name.contains(['/', '\\']) {
            return Err(ShapecropError::validation(format!(
                "invalid product name '{product_name}'"
            )));
        }
        Ok(Self { product_name })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Export stamped with the current wall-clock time.
    pub fn export(&self, job: &ExportJob<'_>) -> ShapecropResult<ExportedPng> {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.export_at(job, epoch_ms)
    }

    #[tracing::instrument(skip(self, job), fields(resolution = %job.resolution))]
    pub fn export_at(&self, job: &ExportJob<'_>, epoch_ms: u128) -> ShapecropResult<ExportedPng> {
        if job.preview.width == 0 || job.preview.height == 0 {
            return Err(ShapecropError::validation(
                "preview canvas must be non-empty to rescale the transform",
            ));
        }
        let canvas = job.resolution.canvas();
        let source = decode_image(job.source)?;
        let mask = decode_any(job.mask, job.resolution.px())?;
        let transform = job.transform.rescaled(job.preview, canvas);
        tracing::debug!(
            source_w = source.width,
            source_h = source.height,
            ?transform,
            "export inputs decoded"
        );

        let raster = composite(&source, &mask, transform, canvas, job.stencil)?;
        let bytes = encode_png(&raster)?;
        Ok(ExportedPng {
            bytes,
            filename: export_filename(&self.product_name, job.resolution, epoch_ms),
            resolution: job.resolution,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/orchestrator.rs"]
mod tests;
