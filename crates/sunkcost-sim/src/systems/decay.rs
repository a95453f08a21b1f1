//! Decay system: ages traps and the treasure, removes expired traps.

use hecs::{Entity, World};

use sunkcost_core::components::{Trap, Treasure};
use sunkcost_core::enums::RoundOutcome;
use sunkcost_core::events::GameEvent;
use sunkcost_core::types::Position;

use crate::decay::Decaying;
use crate::scene::SceneOp;

/// Age every decaying entity by one tick.
///
/// Expired traps are despawned and their views queued for removal. An
/// expired treasure either ends the round (it was stolen) or is re-armed
/// in place. Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<GameEvent>,
    scene_ops: &mut Vec<SceneOp>,
) -> Option<RoundOutcome> {
    despawn_buffer.clear();

    for (entity, (pos, decay, trap)) in world.query_mut::<(&Position, &mut Decaying, &Trap)>() {
        if decay.update() {
            tracing::debug!("[trap] Expired at ({:.0}, {:.0})", pos.x, pos.y);
            events.push(GameEvent::TrapExpired { x: pos.x, y: pos.y });
            scene_ops.push(SceneOp::Remove(trap.view));
            despawn_buffer.push(entity);
        }
    }

    let mut outcome = None;
    for (_entity, (decay, treasure)) in world.query_mut::<(&mut Decaying, &mut Treasure)>() {
        if !decay.update() {
            continue;
        }
        if treasure.stolen {
            outcome = Some(RoundOutcome::HunterWins);
        } else {
            tracing::debug!("[treasure] Aged out, re-arming");
            decay.reset_age();
            events.push(GameEvent::TreasureRearmed);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    outcome
}
