//! Editing session state and its pure reducer.

use std::sync::Arc;

use crate::{
    assets::bitmap::Bitmap,
    foundation::core::Transform,
    session::history::TransformHistory,
};

/// Mask selected when a session starts.
pub const DEFAULT_MASK_ID: &str = "circle";

/// Everything a reducer action may change.
#[derive(Clone, Debug)]
pub enum Action {
    SetImage(Option<Arc<Bitmap>>),
    SetMask(Option<String>),
    SetTransform(Transform),
    ResetTransform,
    Undo,
    Redo,
    SetExporting(bool),
    SetDragging(bool),
    ResetState,
}

/// In-memory state of one editing session.
///
/// `transform` always mirrors `history.current()`; only [`SessionState::apply`] changes either.
#[derive(Clone, Debug)]
pub struct SessionState {
    image: Option<Arc<Bitmap>>,
    mask_id: Option<String>,
    default_mask_id: Option<String>,
    transform: Transform,
    history: TransformHistory,
    is_exporting: bool,
    is_dragging: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MASK_ID.to_string()))
    }
}

impl SessionState {
    pub fn new(default_mask_id: Option<String>) -> Self {
        Self {
            image: None,
            mask_id: default_mask_id.clone(),
            default_mask_id,
            transform: Transform::IDENTITY,
            history: TransformHistory::default(),
            is_exporting: false,
            is_dragging: false,
        }
    }

    pub fn image(&self) -> Option<&Arc<Bitmap>> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn mask_id(&self) -> Option<&str> {
        self.mask_id.as_deref()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn history(&self) -> &TransformHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_exporting(&self) -> bool {
        self.is_exporting
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Apply `action` and return the resulting state.
    pub fn reduce(mut self, action: Action) -> Self {
        self.apply(action);
        self
    }

    /// In-place form of [`SessionState::reduce`].
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetImage(image) => self.image = image,
            Action::SetMask(id) => self.mask_id = id,
            Action::SetTransform(candidate) => self.commit(candidate),
            Action::ResetTransform => self.commit(Transform::IDENTITY),
            Action::Undo => {
                if let Some(t) = self.history.undo() {
                    self.transform = t;
                }
            }
            Action::Redo => {
                if let Some(t) = self.history.redo() {
                    self.transform = t;
                }
            }
            Action::SetExporting(v) => self.is_exporting = v,
            Action::SetDragging(v) => self.is_dragging = v,
            Action::ResetState => *self = Self::new(self.default_mask_id.take()),
        }
    }

    fn commit(&mut self, candidate: Transform) {
        if !candidate.is_usable() {
            tracing::debug!(?candidate, "ignoring non-finite transform");
            return;
        }
        let next = candidate.clamped();
        if self.history.push(next) {
            self.transform = next;
        }
    }
}

/// Owner of the single authoritative [`SessionState`].
#[derive(Debug, Default)]
pub struct Store {
    state: SessionState,
}

impl Store {
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, "dispatch");
        self.state.apply(action);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
