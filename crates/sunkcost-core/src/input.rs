//! Per-frame input handed to the round by the platform layer.
//!
//! Positions are already converted from screen space to world space.
//! The value is rebuilt every frame and passed by reference; there is no
//! global input controller.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Everything the local player did this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// A touch (or mouse press) began this frame.
    pub touch_down: bool,
    /// A touch ended this frame.
    pub touch_released: bool,
    /// Current touch position, if a touch is active.
    pub touch_position: Option<Position>,
    /// World position of a minimap tap (Spirit camera switch).
    pub minimap_tap: Option<Position>,
    /// World point the selected portrait should turn to face.
    pub look_at: Option<Position>,
    /// World position where the Spirit asked to drop a trap.
    pub place_trap: Option<Position>,
    /// Hunter pressed the interact button.
    pub interact: bool,
}

impl InputState {
    /// A frame with no input at all.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A frame where a touch begins at `at`.
    pub fn press(at: Position) -> Self {
        Self {
            touch_down: true,
            touch_position: Some(at),
            ..Self::default()
        }
    }

    /// A frame where an existing touch moves to `at`.
    pub fn hold(at: Position) -> Self {
        Self {
            touch_position: Some(at),
            ..Self::default()
        }
    }

    /// A frame where the touch lifts at `at`.
    pub fn release(at: Position) -> Self {
        Self {
            touch_released: true,
            touch_position: Some(at),
            ..Self::default()
        }
    }
}
