//! Frame driver: wires a `RoundEngine` to its transport and renderer.
//!
//! One call per rendered frame: deliver received messages, tick, broadcast
//! whatever the tick produced, then apply scene changes.

use sunkcost_core::input::InputState;
use sunkcost_core::state::RoundSnapshot;

use crate::engine::RoundEngine;
use crate::net::{NetworkChannel, PeerId};
use crate::scene::{BodyView, SceneSink};

/// Run one frame of the round loop.
pub fn run_frame(
    engine: &mut RoundEngine,
    channel: &mut dyn NetworkChannel,
    scene: &mut dyn SceneSink,
    input: &InputState,
    hunter_body: Option<&dyn BodyView>,
) -> RoundSnapshot {
    channel.receive(&mut |_source: PeerId, bytes: &[u8]| engine.receive(bytes));

    let snapshot = engine.tick(input, hunter_body);

    for message in engine.drain_outbox() {
        channel.broadcast(&message.encode());
    }
    for op in engine.drain_scene_ops() {
        op.apply(scene);
    }
    snapshot
}
