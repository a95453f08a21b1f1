//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Aging and trigger logic lives in the simulation crate.

use serde::{Deserialize, Serialize};

use crate::types::ViewHandle;

/// Marker for a Spirit-placed trap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Trap {
    /// Sprite node shown while the trap is live.
    pub view: ViewHandle,
}

/// Marker for the level's treasure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Treasure {
    /// Whether the Hunter has already set off the treasure alarm.
    pub stolen: bool,
}
