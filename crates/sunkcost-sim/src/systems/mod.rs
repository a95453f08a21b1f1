//! ECS systems that operate on the round's world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for
//! read-only). They do not own state; everything lives in components or
//! in the engine.

pub mod decay;
pub mod snapshot;
pub mod triggers;
