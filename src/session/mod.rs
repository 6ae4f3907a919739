//! Editing session: reducer state, undo/redo history and keyboard shortcuts.

/// Bounded undo/redo history of transforms.
pub mod history;
/// Keyboard shortcut commands.
pub mod shortcuts;
/// Session state, reducer actions and the owning store.
pub mod state;
