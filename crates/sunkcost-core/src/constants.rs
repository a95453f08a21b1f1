//! Simulation constants and tuning parameters.

use crate::types::ViewHandle;

/// Nominal frame rate (Hz). The round advances one tick per rendered frame.
pub const TICK_RATE: u32 = 60;

// --- Battery ---

/// Default battery capacity per portrait (ticks of viewing).
pub const DEFAULT_BATTERY: u32 = 600;

/// A dead camera comes back once `charge * DEN >= max * NUM` (80 %).
pub const BATTERY_REACTIVATE_NUM: u32 = 4;
pub const BATTERY_REACTIVATE_DEN: u32 = 5;

// --- Viewports ---

/// Width of a portrait's viewport rectangle in world pixels.
pub const VIEWPORT_WIDTH: f32 = 1024.0;

/// Height of a portrait's viewport rectangle in world pixels.
pub const VIEWPORT_HEIGHT: f32 = 576.0;

/// Default look-angle limits for a portrait (radians, 0 = +y, clockwise).
pub const DEFAULT_LIMIT_MIN: f32 = -std::f32::consts::PI;
pub const DEFAULT_LIMIT_MAX: f32 = std::f32::consts::PI;

// --- Doors ---

/// Lock animation frames for a front-facing door.
pub const FRONT_DOOR_FRAMES: u32 = 21;

/// Lock animation frames for a side-facing door.
pub const SIDE_DOOR_FRAMES: u32 = 18;

/// Smallest allowed drag step, used when a drag starts on the door itself.
pub const DRAG_STEP_EPSILON: f32 = 1.0e-3;

/// Maximum distance between a touch and a door for the touch to grab it.
pub const DOOR_PICK_RADIUS: f32 = 120.0;

/// Maximum distance between the Hunter and a locked door to open it.
pub const DOOR_REACH_RADIUS: f32 = 100.0;

// --- Traps and treasure ---

/// Half-size of the proximity box that springs a trap or the treasure.
pub const TRIGGER_RADIUS: f32 = 80.0;

/// Ticks a triggered object stays live before it is force-expired.
pub const TRIGGER_TIMEOUT_TICKS: u32 = 150;

/// Concurrent traps the Spirit may have placed.
pub const MAX_TRAPS: usize = 3;

/// Lifetime bounds for a placed trap (ticks, inclusive).
pub const TRAP_MIN_AGE: u32 = 600;
pub const TRAP_MAX_AGE: u32 = 1000;

/// Lifetime of the treasure before it re-arms in place.
pub const TREASURE_MAX_AGE: u32 = 3600;

// --- Level ---

/// Tile size the default trigger radius is tuned for.
pub const DEFAULT_TILE_SIZE: f32 = 40.0;

/// Round length before the Spirit wins by default (5 minutes).
pub const ROUND_DURATION_TICKS: u64 = 5 * 60 * TICK_RATE as u64;

// --- Views ---

/// Full-screen overlay shown while the selected portrait is out of charge.
pub const BLACKOUT_VIEW: ViewHandle = ViewHandle(1);

/// First handle handed out to dynamically spawned views.
pub const FIRST_DYNAMIC_VIEW: u32 = 100;
