//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::{FRONT_DOOR_FRAMES, SIDE_DOOR_FRAMES};

/// Which kind of viewpoint a camera is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraKind {
    /// Free camera used before a level is loaded.
    #[default]
    Default,
    /// The Hunter's own follow camera. Never battery-limited.
    Player,
    /// A fixed Spirit viewpoint with its own battery.
    Portrait,
}

impl CameraKind {
    /// Whether cameras of this kind carry a battery.
    pub fn has_battery(self) -> bool {
        matches!(self, CameraKind::Portrait)
    }
}

/// Which side of the player each participant controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Walks the level looking for the treasure.
    #[default]
    Hunter,
    /// Watches through portraits, places traps and locks doors.
    Spirit,
}

/// Door sprite orientation. Determines the number of lock animation frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorOrientation {
    #[default]
    Front,
    Side,
}

impl DoorOrientation {
    /// Number of discrete lock-drag frames.
    pub fn frame_count(self) -> u32 {
        match self {
            DoorOrientation::Front => FRONT_DOOR_FRAMES,
            DoorOrientation::Side => SIDE_DOOR_FRAMES,
        }
    }
}

/// Door lock state. Discriminants match the values used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum LockState {
    #[default]
    Unlocked = 0,
    Locked = 1,
    Dragging = 2,
}

/// Result of releasing a door drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorOutcome {
    /// The drag reached the terminal frame; the door is now locked.
    Locked,
    /// The drag fell short; the door is back at frame 0.
    Reverted,
}

/// Liveness edge produced by one battery tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryTransition {
    #[default]
    None,
    /// Charge hit zero; the camera is now unavailable.
    Died,
    /// Charge climbed back over the reactivation threshold.
    Revived,
}

/// Round phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No level loaded yet.
    #[default]
    Loading,
    Active,
    Over,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The Hunter held on to the treasure through its trigger window.
    HunterWins,
    /// The round timer ran out first.
    SpiritWins,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
