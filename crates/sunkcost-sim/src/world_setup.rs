//! Builders that turn level data into round state.
//!
//! Creates the portrait set, the door list, and the trap and treasure
//! entities with their component bundles.

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use sunkcost_core::components::{Trap, Treasure};
use sunkcost_core::constants::{DEFAULT_LIMIT_MAX, DEFAULT_LIMIT_MIN};
use sunkcost_core::enums::CameraKind;
use sunkcost_core::error::LevelError;
use sunkcost_core::level::LevelData;
use sunkcost_core::types::{Position, ViewHandle};

use crate::decay::Decaying;
use crate::door::DoorLock;
use crate::engine::RoundConfig;
use crate::portraits::{PortraitDesc, PortraitSet};

/// Build the portrait set in level order. Portrait ids are their indices.
pub fn build_portraits(level: &LevelData, config: &RoundConfig) -> Result<PortraitSet, LevelError> {
    let mut set = PortraitSet::new(level.battery_capacity(), config.viewport_size);
    for (id, spec) in level.portraits().enumerate() {
        set.add_portrait(PortraitDesc {
            id: id as u32,
            position: spec.position.to_vec3(),
            look_direction: Vec3::Y,
            limits: spec.limits.unwrap_or((DEFAULT_LIMIT_MIN, DEFAULT_LIMIT_MAX)),
            battery: spec.battery,
            kind: CameraKind::Portrait,
        })?;
    }
    Ok(set)
}

/// Doors in level order, all unlocked.
pub fn build_doors(level: &LevelData) -> Vec<DoorLock> {
    level
        .doors()
        .map(|(pos, orientation)| DoorLock::new(pos, orientation))
        .collect()
}

/// Spawn the treasure at `pos`.
pub fn spawn_treasure(world: &mut World, pos: Position, config: &RoundConfig) -> hecs::Entity {
    world.spawn((
        pos,
        Decaying::with_timeout(config.treasure_max_age, config.trigger_timeout),
        Treasure::default(),
    ))
}

/// Spawn a trap at `pos` with a lifetime drawn from the configured range.
pub fn spawn_trap(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    pos: Position,
    view: ViewHandle,
    config: &RoundConfig,
) -> hecs::Entity {
    let lo = config.trap_min_age.min(config.trap_max_age);
    let hi = config.trap_min_age.max(config.trap_max_age);
    let max_age = rng.gen_range(lo..=hi);
    world.spawn((
        pos,
        Decaying::with_timeout(max_age, config.trigger_timeout),
        Trap { view },
    ))
}

/// Number of live traps.
pub fn trap_count(world: &World) -> usize {
    world.query::<&Trap>().iter().count()
}
