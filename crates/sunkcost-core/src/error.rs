//! Error types shared across crates.

use thiserror::Error;

/// Failures from portrait lookup and registration.
#[derive(Debug, Error, PartialEq)]
pub enum PortraitError {
    #[error("portrait id {0} is already present")]
    DuplicateId(u32),
    #[error("portrait index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no portrait is selected")]
    NoActiveCamera,
    #[error("direction limits inverted: min {min} > max {max}")]
    InvalidLimits { min: f32, max: f32 },
}

/// Failures while reading a level file.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level defines no portraits")]
    NoPortraits,
    #[error("battery capacity must be positive, got {0}")]
    InvalidBattery(u32),
    #[error(transparent)]
    Portrait(#[from] PortraitError),
}

/// Failures while decoding a network payload.
#[derive(Debug, Error, PartialEq)]
pub enum NetError {
    #[error("empty message")]
    Empty,
    #[error("payload of {0} bytes is not a whole number of floats")]
    Misaligned(usize),
    #[error("message code {code} needs {expected} values, got {got}")]
    Truncated {
        code: u32,
        expected: usize,
        got: usize,
    },
    #[error("invalid index value {0}")]
    InvalidIndex(f32),
}
