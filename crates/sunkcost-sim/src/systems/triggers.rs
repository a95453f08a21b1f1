//! Proximity system: springs traps and the treasure when the Hunter is close.

use hecs::World;

use sunkcost_core::components::{Trap, Treasure};
use sunkcost_core::events::GameEvent;
use sunkcost_core::types::Position;

use crate::decay::{within_trigger_radius, Decaying};

/// Check every live trap and the treasure against the Hunter's position.
/// Returns true when the treasure was reached this tick.
pub fn run(
    world: &mut World,
    hunter: Position,
    radius: f32,
    events: &mut Vec<GameEvent>,
) -> bool {
    for (_entity, (pos, decay, _trap)) in world.query_mut::<(&Position, &mut Decaying, &Trap)>() {
        if decay.is_triggered() || decay.is_expired() {
            continue;
        }
        if within_trigger_radius(*pos, hunter, radius) {
            decay.set_trigger(true);
            tracing::info!("[trap] Sprung at ({:.0}, {:.0})", pos.x, pos.y);
            events.push(GameEvent::TrapSprung { x: pos.x, y: pos.y });
        }
    }

    let mut reached = false;
    for (_entity, (pos, decay, treasure)) in
        world.query_mut::<(&Position, &mut Decaying, &mut Treasure)>()
    {
        if treasure.stolen || !within_trigger_radius(*pos, hunter, radius) {
            continue;
        }
        mark_stolen(decay, treasure);
        tracing::info!("[treasure] Hunter reached the treasure");
        events.push(GameEvent::TreasureStolen);
        reached = true;
    }
    reached
}

/// Put the treasure into its stolen state. Idempotent.
pub fn mark_stolen(decay: &mut Decaying, treasure: &mut Treasure) {
    if !treasure.stolen {
        treasure.stolen = true;
        decay.set_trigger(true);
    }
}

/// Whether any trap currently holds the Hunter.
pub fn hunter_trapped(world: &World) -> bool {
    world
        .query::<(&Decaying, &Trap)>()
        .iter()
        .any(|(_, (decay, _))| decay.is_triggered())
}
