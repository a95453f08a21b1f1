//! Snapshot system: queries the round state and builds a RoundSnapshot.
//!
//! Read-only; it never modifies the world.

use hecs::World;

use sunkcost_core::components::{Trap, Treasure};
use sunkcost_core::enums::*;
use sunkcost_core::events::{Alert, GameEvent};
use sunkcost_core::state::*;
use sunkcost_core::types::{Position, SimTime};

use crate::decay::Decaying;
use crate::door::DoorLock;
use crate::portraits::PortraitSet;

/// Round-level values that don't live in the world.
pub struct RoundHeader {
    pub time: SimTime,
    pub phase: RoundPhase,
    pub role: Role,
    pub outcome: Option<RoundOutcome>,
    pub hunter: Option<Position>,
}

/// Build a complete RoundSnapshot from the current round state.
pub fn build_snapshot(
    header: RoundHeader,
    world: &World,
    portraits: &PortraitSet,
    doors: &[DoorLock],
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
) -> RoundSnapshot {
    RoundSnapshot {
        time: header.time,
        phase: header.phase,
        role: header.role,
        outcome: header.outcome,
        active_index: portraits.active_index(),
        viewport: portraits.current_viewport().ok(),
        blackout: !portraits.active_is_live(),
        cameras: build_cameras(portraits),
        doors: build_doors(doors),
        traps: build_traps(world),
        treasure: build_treasure(world),
        hunter: header.hunter,
        hunter_trapped: crate::systems::triggers::hunter_trapped(world),
        events,
        alerts,
    }
}

fn build_cameras(portraits: &PortraitSet) -> Vec<CameraView> {
    let active = portraits.active_index();
    portraits
        .iter()
        .enumerate()
        .map(|(i, (camera, battery))| CameraView {
            id: camera.id(),
            kind: camera.kind(),
            position: camera.ground_position(),
            charge_fraction: battery.map_or(1.0, |b| b.charge_fraction()),
            heading: camera.heading(),
            is_active: battery.map_or(true, |b| b.is_active()),
            selected: active == Some(i),
        })
        .collect()
}

fn build_doors(doors: &[DoorLock]) -> Vec<DoorView> {
    doors
        .iter()
        .enumerate()
        .map(|(index, door)| DoorView {
            index,
            position: door.position(),
            orientation: door.orientation(),
            state: door.state(),
            frame: door.frame(),
        })
        .collect()
}

fn build_traps(world: &World) -> Vec<TrapView> {
    let mut traps: Vec<TrapView> = world
        .query::<(&Position, &Decaying, &Trap)>()
        .iter()
        .map(|(_, (pos, decay, _))| TrapView {
            position: *pos,
            triggered: decay.is_triggered(),
            age: decay.age(),
            max_age: decay.max_age(),
        })
        .collect();
    // Oldest first so the order is stable across ticks.
    traps.sort_by(|a, b| b.age.cmp(&a.age));
    traps
}

fn build_treasure(world: &World) -> Option<TreasureView> {
    world
        .query::<(&Position, &Decaying, &Treasure)>()
        .iter()
        .next()
        .map(|(_, (pos, decay, treasure))| TreasureView {
            position: *pos,
            triggered: decay.is_triggered(),
            stolen: treasure.stolen,
        })
}
