//! Level file model.
//!
//! Levels are JSON documents with the map size, an optional battery capacity
//! and a flat list of objects discriminated by `class`:
//!
//! ```json
//! { "width": 32, "height": 24, "tile": 40.0, "battery": 600,
//!   "objects": [
//!     { "class": "portrait", "pos": [200.0, 300.0] },
//!     { "class": "door", "pos": [640.0, 320.0], "orientation": "side" },
//!     { "class": "player", "pos": [80.0, 80.0] },
//!     { "class": "treasure", "pos": [1100.0, 700.0] }
//!   ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BATTERY, DEFAULT_TILE_SIZE};
use crate::enums::DoorOrientation;
use crate::error::LevelError;
use crate::types::Position;

/// A parsed level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Tile edge in world pixels.
    #[serde(default)]
    pub tile: Option<f32>,
    /// Battery capacity shared by every portrait.
    #[serde(default)]
    pub battery: Option<u32>,
    #[serde(default)]
    pub objects: Vec<LevelObject>,
}

/// One placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum LevelObject {
    Portrait {
        pos: [f32; 2],
        /// Starting charge for this portrait only.
        #[serde(default)]
        battery: Option<u32>,
        /// Look-angle limits in radians.
        #[serde(default)]
        limits: Option<[f32; 2]>,
    },
    Player {
        pos: [f32; 2],
    },
    Door {
        pos: [f32; 2],
        #[serde(default)]
        orientation: DoorOrientation,
    },
    Treasure {
        pos: [f32; 2],
    },
}

/// Portrait entry extracted from the object list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortraitSpec {
    pub position: Position,
    pub battery: Option<u32>,
    pub limits: Option<(f32, f32)>,
}

impl LevelData {
    /// Parse and validate a level document.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Check the invariants the round relies on.
    pub fn validate(&self) -> Result<(), LevelError> {
        if let Some(0) = self.battery {
            return Err(LevelError::InvalidBattery(0));
        }
        if self.portraits().next().is_none() {
            return Err(LevelError::NoPortraits);
        }
        Ok(())
    }

    /// Battery capacity for this level.
    pub fn battery_capacity(&self) -> u32 {
        self.battery.unwrap_or(DEFAULT_BATTERY)
    }

    /// Factor to apply to tile-relative distances such as the trigger radius.
    pub fn tile_scale(&self) -> f32 {
        match self.tile {
            Some(tile) if tile > 0.0 => tile / DEFAULT_TILE_SIZE,
            _ => 1.0,
        }
    }

    /// Portraits in level order.
    pub fn portraits(&self) -> impl Iterator<Item = PortraitSpec> + '_ {
        self.objects.iter().filter_map(|o| match o {
            LevelObject::Portrait {
                pos,
                battery,
                limits,
            } => Some(PortraitSpec {
                position: Position::new(pos[0], pos[1]),
                battery: *battery,
                limits: limits.map(|l| (l[0], l[1])),
            }),
            _ => None,
        })
    }

    /// Doors in level order. The order is the door index used on the wire.
    pub fn doors(&self) -> impl Iterator<Item = (Position, DoorOrientation)> + '_ {
        self.objects.iter().filter_map(|o| match o {
            LevelObject::Door { pos, orientation } => {
                Some((Position::new(pos[0], pos[1]), *orientation))
            }
            _ => None,
        })
    }

    /// Hunter spawn point, if the level has one.
    pub fn player_start(&self) -> Option<Position> {
        self.objects.iter().find_map(|o| match o {
            LevelObject::Player { pos } => Some(Position::new(pos[0], pos[1])),
            _ => None,
        })
    }

    /// Treasure location, if the level has one.
    pub fn treasure(&self) -> Option<Position> {
        self.objects.iter().find_map(|o| match o {
            LevelObject::Treasure { pos } => Some(Position::new(pos[0], pos[1])),
            _ => None,
        })
    }
}
