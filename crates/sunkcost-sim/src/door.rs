//! Door lock drag state machine.
//!
//! `Unlocked -> Dragging -> {Locked | Unlocked}`. Locking is all or
//! nothing: releasing a drag short of the last frame reverts the door to
//! frame 0. `Locked` holds until the Hunter reopens the door.

use sunkcost_core::constants::DRAG_STEP_EPSILON;
use sunkcost_core::enums::{DoorOrientation, DoorOutcome, LockState};
use sunkcost_core::types::Position;

/// One lockable door.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorLock {
    position: Position,
    orientation: DoorOrientation,
    state: LockState,
    drag_start_distance: f32,
    step: f32,
    frame: u32,
}

impl DoorLock {
    pub fn new(position: Position, orientation: DoorOrientation) -> Self {
        Self {
            position,
            orientation,
            state: LockState::Unlocked,
            drag_start_distance: 0.0,
            step: DRAG_STEP_EPSILON,
            frame: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn orientation(&self) -> DoorOrientation {
        self.orientation
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn frame_count(&self) -> u32 {
        self.orientation.frame_count()
    }

    pub fn drag_start_distance(&self) -> f32 {
        self.drag_start_distance
    }

    pub fn is_dragging(&self) -> bool {
        self.state == LockState::Dragging
    }

    /// Start a drag from `touch`. Only an unlocked door can be grabbed.
    /// Returns whether the drag started.
    pub fn begin_drag(&mut self, touch: Position) -> bool {
        if self.state != LockState::Unlocked {
            return false;
        }
        self.state = LockState::Dragging;
        self.frame = 0;
        self.set_step(touch.range_to(&self.position));
        true
    }

    /// Distance covered by one frame. Never zero, so a drag that starts on
    /// the door still produces a finite frame.
    fn set_step(&mut self, drag_start_distance: f32) {
        self.drag_start_distance = drag_start_distance;
        let raw = drag_start_distance / (self.frame_count() - 1) as f32;
        self.step = raw.max(DRAG_STEP_EPSILON);
    }

    /// Move an active drag to `touch`. No effect unless dragging.
    pub fn drag_to(&mut self, touch: Position) {
        if self.state != LockState::Dragging {
            return;
        }
        let last = self.frame_count() - 1;
        let raw = (touch.range_to(&self.position) / self.step).floor();
        // `as` saturates, so huge or NaN distances land on 0 or u32::MAX.
        self.frame = (raw as u32).min(last);
    }

    /// Let go of an active drag.
    pub fn release(&mut self) -> Option<DoorOutcome> {
        if self.state != LockState::Dragging {
            return None;
        }
        if self.frame == self.frame_count() - 1 {
            self.state = LockState::Locked;
            Some(DoorOutcome::Locked)
        } else {
            self.state = LockState::Unlocked;
            self.frame = 0;
            Some(DoorOutcome::Reverted)
        }
    }

    /// Feed one frame of touch input. Returns the outcome when a drag ends.
    pub fn update(
        &mut self,
        touch_started: bool,
        touch_released: bool,
        touch_position: Position,
    ) -> Option<DoorOutcome> {
        match self.state {
            LockState::Unlocked if touch_started => {
                self.begin_drag(touch_position);
                None
            }
            LockState::Dragging => {
                self.drag_to(touch_position);
                if touch_released {
                    self.release()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Reopen the door. Used when the Hunter opens a locked door, locally
    /// or via a network unlock request.
    pub fn reset_to_unlock(&mut self) {
        self.state = LockState::Unlocked;
        self.frame = 0;
    }

    /// Mark the door locked at its last frame. Used to mirror a lock
    /// performed by the other peer.
    pub fn force_lock(&mut self) {
        self.state = LockState::Locked;
        self.frame = self.frame_count() - 1;
    }
}
