//! Pan, pinch and wheel gesture handling.

/// Gesture state machine.
pub mod controller;
