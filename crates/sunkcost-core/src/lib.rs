//! Core types and definitions for Sunk Cost.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, enums, per-frame input, events, snapshot views, level data,
//! error types and tuning constants. It has no dependency on any engine
//! or transport.

pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod input;
pub mod level;
pub mod state;
pub mod types;
