//! Pointer, touch and wheel input turned into transform updates.

use crate::{
    foundation::core::{Point, Transform, Vec2},
    session::state::{Action, Store},
};

/// Scale change per wheel notch.
pub const WHEEL_SCALE_STEP: f64 = 0.1;

/// Raw input, in canvas pixel coordinates.
///
/// Touch variants carry every touch still active after the event, in the order the platform
/// reports them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureInput {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Pointer left the canvas or capture was lost.
    PointerLeave,
    TouchStart(Vec<Point>),
    TouchMove(Vec<Point>),
    TouchEnd(Vec<Point>),
    TouchCancel,
    /// Positive `delta_y` scrolls away from the user and zooms out.
    Wheel { delta_y: f64 },
}

/// Interaction state. Exactly one variant is live at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Panning { origin: Point },
    Pinching { last_distance: f64, last_midpoint: Point },
}

/// Disambiguates pan and pinch and dispatches `SetTransform` into a [`Store`].
///
/// The controller keeps no copy of the transform; every update reads the store's current value.
#[derive(Clone, Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Feed one input event. Returns the transform dispatched, if any.
    ///
    /// Input is ignored entirely while no source image is loaded.
    pub fn handle(&mut self, store: &mut Store, input: &GestureInput) -> Option<Transform> {
        if !store.state().has_image() {
            return None;
        }

        match input {
            GestureInput::PointerDown(p) => {
                self.state = GestureState::Panning { origin: *p };
                None
            }
            GestureInput::PointerMove(p) => self.pan_to(store, *p),
            GestureInput::PointerUp | GestureInput::PointerLeave | GestureInput::TouchCancel => {
                self.state = GestureState::Idle;
                None
            }
            GestureInput::TouchStart(touches) => {
                self.touch_start(touches);
                None
            }
            GestureInput::TouchMove(touches) => match (self.state, touches.as_slice()) {
                (GestureState::Pinching { .. }, [a, b, ..]) => self.pinch_to(store, *a, *b),
                (GestureState::Panning { .. }, [p]) => self.pan_to(store, *p),
                _ => None,
            },
            GestureInput::TouchEnd(remaining) => {
                self.touch_end(remaining);
                None
            }
            GestureInput::Wheel { delta_y } => wheel(store, *delta_y),
        }
    }

    fn touch_start(&mut self, touches: &[Point]) {
        match (self.state, touches) {
            (_, []) => {}
            (GestureState::Idle, [p]) => self.state = GestureState::Panning { origin: *p },
            (GestureState::Pinching { .. }, [_, _, ..]) => {}
            (_, [a, b, ..]) => self.state = pinch_baseline(*a, *b),
            // A lone touch while already tracking one is a platform re-report; keep state.
            (_, [_]) => {}
        }
    }

    fn touch_end(&mut self, remaining: &[Point]) {
        match (self.state, remaining) {
            (_, []) => self.state = GestureState::Idle,
            (GestureState::Pinching { .. }, [p]) => {
                self.state = GestureState::Panning { origin: *p };
            }
            (GestureState::Pinching { .. }, [a, b, ..]) => {
                // A third finger lifted; re-baseline on the two that remain.
                self.state = pinch_baseline(*a, *b);
            }
            _ => {}
        }
    }

    fn pan_to(&mut self, store: &mut Store, p: Point) -> Option<Transform> {
        let GestureState::Panning { origin } = self.state else {
            return None;
        };
        self.state = GestureState::Panning { origin: p };
        let delta = p - origin;
        if delta == Vec2::ZERO {
            return None;
        }
        let next = store.state().transform().translated_by(delta);
        dispatch(store, next)
    }

    fn pinch_to(&mut self, store: &mut Store, a: Point, b: Point) -> Option<Transform> {
        let GestureState::Pinching {
            last_distance,
            last_midpoint,
        } = self.state
        else {
            return None;
        };
        let distance = a.distance(b);
        let midpoint = a.midpoint(b);
        self.state = GestureState::Pinching {
            last_distance: distance,
            last_midpoint: midpoint,
        };

        let current = store.state().transform();
        let scale = if last_distance > 0.0 {
            Transform::clamp_scale(current.scale * (distance / last_distance))
        } else {
            current.scale
        };
        let next = current
            .with_scale(scale)
            .translated_by(midpoint - last_midpoint);
        dispatch(store, next)
    }
}

fn pinch_baseline(a: Point, b: Point) -> GestureState {
    GestureState::Pinching {
        last_distance: a.distance(b),
        last_midpoint: a.midpoint(b),
    }
}

fn wheel(store: &mut Store, delta_y: f64) -> Option<Transform> {
    if delta_y == 0.0 || delta_y.is_nan() {
        return None;
    }
    let step = if delta_y > 0.0 {
        -WHEEL_SCALE_STEP
    } else {
        WHEEL_SCALE_STEP
    };
    let current = store.state().transform();
    let next = current.with_scale(Transform::clamp_scale(current.scale + step));
    dispatch(store, next)
}

fn dispatch(store: &mut Store, next: Transform) -> Option<Transform> {
    if next == store.state().transform() {
        return None;
    }
    store.dispatch(Action::SetTransform(next));
    Some(store.state().transform())
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/controller.rs"]
mod tests;
