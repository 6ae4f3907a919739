//! Application root tying the session store to assets, gestures, preview and export.

use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::{
        bitmap::Bitmap,
        catalog::MaskCatalog,
        ingest::{SourceImage, ingest_source, mime_from_extension},
    },
    config::EditorConfig,
    export::{
        delivery::{Delivered, Delivery, deliver},
        orchestrator::{ExportJob, ExportResolution, ExportedPng, Exporter},
    },
    foundation::{
        core::Transform,
        error::{ShapecropError, ShapecropResult},
    },
    gesture::controller::{GestureController, GestureInput, GestureState},
    render::{compositor::composite, raster::Raster},
    session::{
        shortcuts::Shortcut,
        state::{Action, SessionState, Store},
    },
};

/// One editing session.
///
/// The editor is the only owner of the [`Store`]; every mutation goes through a reducer action,
/// and the gesture controller writes through the same store instead of keeping its own transform.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    catalog: MaskCatalog,
    exporter: Exporter,
    store: Store,
    gestures: GestureController,
    source: Option<SourceImage>,
    mask: Option<Arc<Bitmap>>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> ShapecropResult<Self> {
        config.validate()?;
        let catalog = match (&config.masks, &config.masks_dir) {
            (Some(entries), dir) => MaskCatalog::from_entries(entries.clone(), dir.clone())?,
            (None, Some(dir)) => MaskCatalog::builtin().with_root(dir),
            (None, None) => MaskCatalog::builtin(),
        };
        let exporter = Exporter::new(config.product_name.clone())?;
        let store = Store::new(SessionState::new(config.default_mask.clone()));

        let mut editor = Self {
            config,
            catalog,
            exporter,
            store,
            gestures: GestureController::new(),
            source: None,
            mask: None,
        };
        editor.reload_selected_mask();
        Ok(editor)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MaskCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub fn transform(&self) -> Transform {
        self.store.state().transform()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Preview-resolution bitmap of the selected mask.
    pub fn mask_bitmap(&self) -> Option<&Arc<Bitmap>> {
        self.mask.as_ref()
    }

    /// Accept a user-provided photo.
    ///
    /// A rejected MIME type leaves the current image in place; bytes that fail to decode clear it.
    pub fn load_image(&mut self, bytes: Vec<u8>, declared_mime: &str) -> ShapecropResult<()> {
        match ingest_source(bytes, declared_mime, self.config.max_preview_dim) {
            Ok(source) => {
                tracing::info!(
                    width = source.full_width,
                    height = source.full_height,
                    "source image loaded"
                );
                self.store
                    .dispatch(Action::SetImage(Some(source.preview.clone())));
                self.source = Some(source);
                Ok(())
            }
            Err(err @ ShapecropError::Validation(_)) => Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "source image failed to load, clearing selection");
                self.clear_image();
                Err(err)
            }
        }
    }

    pub fn load_image_path(&mut self, path: &Path) -> ShapecropResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        self.load_image(bytes, mime_from_extension(path))
    }

    pub fn clear_image(&mut self) {
        self.source = None;
        self.gestures = GestureController::new();
        self.store.dispatch(Action::SetImage(None));
    }

    /// Select a catalog mask. An unknown id or an undecodable resource clears the selection.
    pub fn select_mask(&mut self, id: &str) -> ShapecropResult<()> {
        match self.load_mask_bitmap(id) {
            Ok(bitmap) => {
                self.mask = Some(Arc::new(bitmap));
                self.store.dispatch(Action::SetMask(Some(id.to_string())));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(mask = id, error = %err, "mask unavailable, clearing selection");
                self.clear_mask();
                Err(err)
            }
        }
    }

    pub fn clear_mask(&mut self) {
        self.mask = None;
        self.store.dispatch(Action::SetMask(None));
    }

    fn load_mask_bitmap(&self, id: &str) -> ShapecropResult<Bitmap> {
        let entry = self.catalog.resolve(id)?;
        let canvas = self.config.preview_canvas;
        self.catalog
            .load_bitmap(entry, canvas.width.max(canvas.height))
    }

    fn reload_selected_mask(&mut self) {
        match self.store.state().mask_id().map(str::to_string) {
            // Failure is logged and the selection cleared inside `select_mask`.
            Some(id) => {
                let _ = self.select_mask(&id);
            }
            None => self.mask = None,
        }
    }

    pub fn handle_input(&mut self, input: &GestureInput) -> Option<Transform> {
        self.gestures.handle(&mut self.store, input)
    }

    /// Run a keyboard shortcut against the current transform.
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        let action = shortcut.action(self.transform());
        self.store.dispatch(action);
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.store.dispatch(Action::SetTransform(transform));
    }

    pub fn reset_transform(&mut self) {
        self.store.dispatch(Action::ResetTransform);
    }

    pub fn undo(&mut self) {
        self.store.dispatch(Action::Undo);
    }

    pub fn redo(&mut self) {
        self.store.dispatch(Action::Redo);
    }

    /// A file is being dragged over (or away from) the drop target.
    pub fn set_file_drag_hover(&mut self, hovering: bool) {
        self.store.dispatch(Action::SetDragging(hovering));
    }

    /// Back to a fresh session: no image, default mask, identity transform, empty history.
    pub fn reset_session(&mut self) {
        self.source = None;
        self.gestures = GestureController::new();
        self.store.dispatch(Action::ResetState);
        self.reload_selected_mask();
    }

    /// Composite the preview canvas. `None` until both an image and a mask are selected.
    pub fn render_preview(&self) -> ShapecropResult<Option<Raster>> {
        let state = self.store.state();
        let (Some(image), Some(mask)) = (state.image(), self.mask.as_ref()) else {
            return Ok(None);
        };
        let raster = composite(
            image,
            mask,
            state.transform(),
            self.config.preview_canvas,
            self.config.stencil,
        )?;
        Ok(Some(raster))
    }

    /// Export at `resolution` and hand the file to `delivery`.
    ///
    /// Returns `Ok(None)` without doing anything while another export is in progress. The
    /// exporting flag is cleared on every path out of this call.
    pub fn export(
        &mut self,
        resolution: ExportResolution,
        delivery: &mut dyn Delivery,
    ) -> ShapecropResult<Option<(ExportedPng, Delivered)>> {
        if self.store.state().is_exporting() {
            tracing::debug!("export already in progress, ignoring request");
            return Ok(None);
        }

        self.store.dispatch(Action::SetExporting(true));
        let result = self.run_export(resolution, delivery);
        self.store.dispatch(Action::SetExporting(false));

        match result {
            Ok(out) => Ok(Some(out)),
            Err(err) => {
                tracing::error!(error = %err, %resolution, "export failed");
                Err(err)
            }
        }
    }

    fn run_export(
        &self,
        resolution: ExportResolution,
        delivery: &mut dyn Delivery,
    ) -> ShapecropResult<(ExportedPng, Delivered)> {
        let state = self.store.state();
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ShapecropError::validation("select an image before exporting"))?;
        let mask_id = state
            .mask_id()
            .ok_or_else(|| ShapecropError::validation("select a mask before exporting"))?;
        let entry = self.catalog.resolve(mask_id)?;
        let mask = self.catalog.load_bytes(entry)?;

        let job = ExportJob {
            source: &source.original,
            mask: &mask,
            transform: state.transform(),
            preview: self.config.preview_canvas,
            resolution,
            stencil: self.config.stencil,
        };
        let png = self.exporter.export(&job)?;
        let delivered = deliver(delivery, &png)?;
        Ok((png, delivered))
    }
}

#[cfg(test)]
#[path = "../tests/unit/editor.rs"]
mod tests;
