//! Aging and trigger window shared by traps and the treasure.
//!
//! Pure data plus tick logic, no ECS dependency. Proximity detection is the
//! caller's job; this type only learns about it through `set_trigger`.

use sunkcost_core::constants::TRIGGER_TIMEOUT_TICKS;
use sunkcost_core::types::Position;

/// A world object that ages out, and that expires early once it has been
/// triggered for longer than the trigger timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decaying {
    triggered: bool,
    trigger_elapsed: u32,
    age: u32,
    max_age: u32,
    timeout: u32,
}

impl Decaying {
    pub fn new(max_age: u32) -> Self {
        Self::with_timeout(max_age, TRIGGER_TIMEOUT_TICKS)
    }

    /// Like `new`, with a non-default trigger timeout.
    pub fn with_timeout(max_age: u32, timeout: u32) -> Self {
        Self {
            triggered: false,
            trigger_elapsed: 0,
            age: 0,
            max_age,
            timeout,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn trigger_elapsed(&self) -> u32 {
        self.trigger_elapsed
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.max_age
    }

    pub fn set_trigger(&mut self, triggered: bool) {
        self.triggered = triggered;
    }

    /// Start a fresh lifetime in place.
    pub fn reset_age(&mut self) {
        self.age = 0;
        self.trigger_elapsed = 0;
        self.triggered = false;
    }

    /// Advance one frame. Returns true once the object has expired; the
    /// caller owns removal.
    pub fn update(&mut self) -> bool {
        if self.triggered {
            self.trigger_elapsed = self.trigger_elapsed.saturating_add(1);
            if self.trigger_elapsed > self.timeout {
                self.triggered = false;
                self.age = self.max_age;
            }
        }
        self.age = self.age.saturating_add(1);
        self.is_expired()
    }
}

/// Proximity test used to spring traps and the treasure.
pub fn within_trigger_radius(object: Position, hunter: Position, radius: f32) -> bool {
    object.within_box(&hunter, radius)
}
