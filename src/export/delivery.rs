//! Handing an exported file to the user.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    export::orchestrator::ExportedPng,
    foundation::error::{ShapecropError, ShapecropResult},
};

/// How an export finally reached the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivered {
    Shared,
    Downloaded(PathBuf),
}

/// A platform sink for exported files.
///
/// `share` is only attempted when `can_share_files` reports support (a touch-capable runtime with a
/// native share sheet); `download` is the universal fallback.
pub trait Delivery {
    fn can_share_files(&self) -> bool {
        false
    }

    fn share(&mut self, file: &ExportedPng) -> ShapecropResult<()> {
        let _ = file;
        Err(ShapecropError::export("sharing is not supported here"))
    }

    fn download(&mut self, file: &ExportedPng) -> ShapecropResult<PathBuf>;
}

/// Try the share sheet first, then fall back to a direct download.
pub fn deliver(delivery: &mut dyn Delivery, file: &ExportedPng) -> ShapecropResult<Delivered> {
    if delivery.can_share_files() {
        match delivery.share(file) {
            Ok(()) => return Ok(Delivered::Shared),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    filename = %file.filename,
                    "share failed, downloading instead"
                );
            }
        }
    }
    let path = delivery.download(file)?;
    Ok(Delivered::Downloaded(path))
}

/// "Download" by writing into a directory.
///
/// Files are written to a hidden temporary name and renamed into place, so a failed write never
/// leaves a truncated PNG under the final name.
#[derive(Clone, Debug)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Delivery for DirectoryDownload {
    fn download(&mut self, file: &ExportedPng) -> ShapecropResult<PathBuf> {
        if file.filename.contains(['/', '\\']) || file.filename.starts_with('.') {
            return Err(ShapecropError::export(format!(
                "refusing to write suspicious filename '{}'",
                file.filename
            )));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;

        let final_path = self.dir.join(&file.filename);
        let tmp_path = self.dir.join(format!(".{}.partial", file.filename));
        let written = std::fs::write(&tmp_path, &file.bytes)
            .with_context(|| format!("write '{}'", tmp_path.display()))
            .and_then(|()| {
                std::fs::rename(&tmp_path, &final_path)
                    .with_context(|| format!("move into '{}'", final_path.display()))
            });
        if let Err(err) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        tracing::info!(path = %final_path.display(), bytes = file.bytes.len(), "wrote export");
        Ok(final_path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/delivery.rs"]
mod tests;
