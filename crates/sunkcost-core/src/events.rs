//! Events emitted by the round for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Something a player would notice happened this tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// The Spirit is now looking through a different portrait.
    CameraSwitched { index: usize },
    /// A portrait ran out of charge.
    CameraDied { index: usize },
    /// A portrait recharged past the reactivation threshold.
    CameraRevived { index: usize },
    /// The selected portrait went dark.
    BlackoutStarted,
    /// The selected portrait came back.
    BlackoutEnded,
    /// A door drag completed.
    DoorLocked { index: usize },
    /// A door drag was released short of the end.
    DoorDragReverted { index: usize },
    /// A locked door was reopened by the Hunter.
    DoorUnlocked { index: usize },
    TrapPlaced { x: f32, y: f32 },
    /// The Hunter walked into a trap.
    TrapSprung { x: f32, y: f32 },
    TrapExpired { x: f32, y: f32 },
    /// The Hunter reached the treasure.
    TreasureStolen,
    /// The treasure aged out untouched and was re-armed.
    TreasureRearmed,
    RoundOver { outcome: RoundOutcome },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
