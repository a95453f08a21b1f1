//! Round simulation for Sunk Cost.
//!
//! Holds the Spirit's portrait and battery economy, the door lock and
//! trap state machines, the network message codec, and the round engine
//! that steps them all once per frame.

pub mod battery;
pub mod camera;
pub mod decay;
pub mod door;
pub mod engine;
pub mod net;
pub mod portraits;
pub mod round;
pub mod scene;
pub mod systems;
pub mod world_setup;

pub use engine::{RoundConfig, RoundEngine};
pub use sunkcost_core as core;

#[cfg(test)]
mod tests;
