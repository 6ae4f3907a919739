//! Keyboard shortcut commands expressed as reducer actions.

use crate::{
    foundation::core::{Transform, Vec2},
    session::state::Action,
};

pub const ZOOM_STEP: f64 = 0.2;
pub const NUDGE_PX: f64 = 2.0;
pub const NUDGE_COARSE_PX: f64 = 10.0;
pub const FILL_SCALE: f64 = 1.5;
pub const CONTAIN_SCALE: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeDir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    Reset,
    ZoomIn,
    ZoomOut,
    Fill,
    Contain,
    Nudge { dir: NudgeDir, coarse: bool },
    Undo,
    Redo,
}

impl Shortcut {
    /// Map a key press to a shortcut. `key` uses DOM `KeyboardEvent.key` names.
    pub fn from_key(key: &str, ctrl_or_meta: bool, shift: bool) -> Option<Self> {
        if ctrl_or_meta {
            return match key {
                "z" | "Z" if shift => Some(Self::Redo),
                "z" | "Z" => Some(Self::Undo),
                "y" | "Y" => Some(Self::Redo),
                _ => None,
            };
        }
        let nudge = |dir| Some(Self::Nudge { dir, coarse: shift });
        match key {
            "r" | "R" => Some(Self::Reset),
            "+" | "=" => Some(Self::ZoomIn),
            "-" | "_" => Some(Self::ZoomOut),
            "f" | "F" => Some(Self::Fill),
            "c" | "C" => Some(Self::Contain),
            "ArrowUp" => nudge(NudgeDir::Up),
            "ArrowDown" => nudge(NudgeDir::Down),
            "ArrowLeft" => nudge(NudgeDir::Left),
            "ArrowRight" => nudge(NudgeDir::Right),
            _ => None,
        }
    }

    /// The action this shortcut dispatches given the current transform.
    pub fn action(self, current: Transform) -> Action {
        match self {
            Self::Reset => Action::ResetTransform,
            Self::ZoomIn => Action::SetTransform(current.with_scale(current.scale + ZOOM_STEP)),
            Self::ZoomOut => Action::SetTransform(current.with_scale(current.scale - ZOOM_STEP)),
            Self::Fill => Action::SetTransform(Transform::new(FILL_SCALE, 0.0, 0.0)),
            Self::Contain => Action::SetTransform(Transform::new(CONTAIN_SCALE, 0.0, 0.0)),
            Self::Nudge { dir, coarse } => {
                let step = if coarse { NUDGE_COARSE_PX } else { NUDGE_PX };
                let delta = match dir {
                    NudgeDir::Up => Vec2::new(0.0, -step),
                    NudgeDir::Down => Vec2::new(0.0, step),
                    NudgeDir::Left => Vec2::new(-step, 0.0),
                    NudgeDir::Right => Vec2::new(step, 0.0),
                };
                Action::SetTransform(current.translated_by(delta))
            }
            Self::Undo => Action::Undo,
            Self::Redo => Action::Redo,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/shortcuts.rs"]
mod tests;
