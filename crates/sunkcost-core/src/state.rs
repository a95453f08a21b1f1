//! Round state snapshot: the visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, GameEvent};
use crate::types::{Position, Rect, SimTime};

/// Complete round state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub time: SimTime,
    pub phase: RoundPhase,
    pub role: Role,
    pub outcome: Option<RoundOutcome>,
    /// Selected portrait, if any.
    pub active_index: Option<usize>,
    /// Viewport of the selected portrait.
    pub viewport: Option<Rect>,
    /// True while the selected portrait has no charge.
    pub blackout: bool,
    pub cameras: Vec<CameraView>,
    pub doors: Vec<DoorView>,
    pub traps: Vec<TrapView>,
    pub treasure: Option<TreasureView>,
    pub hunter: Option<Position>,
    /// True while a sprung trap holds the Hunter.
    pub hunter_trapped: bool,
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

/// One portrait as drawn on the minimap and battery bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraView {
    pub id: u32,
    pub kind: CameraKind,
    pub position: Position,
    /// Charge as a fraction of capacity (0.0 - 1.0).
    pub charge_fraction: f32,
    /// Look heading in radians, 0 = +y, clockwise.
    pub heading: f32,
    pub is_active: bool,
    pub selected: bool,
}

/// Door lock state for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorView {
    pub index: usize,
    pub position: Position,
    pub orientation: DoorOrientation,
    pub state: LockState,
    /// Lock animation frame.
    pub frame: u32,
}

/// A live trap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapView {
    pub position: Position,
    pub triggered: bool,
    pub age: u32,
    pub max_age: u32,
}

/// The treasure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasureView {
    pub position: Position,
    pub triggered: bool,
    pub stolen: bool,
}
