//! Error types shared across the crate

use std::io;
use thiserror::Error;

/// Failures of the persistent key-value store.
///
/// The timer engine never propagates these; they are logged and dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Rejected timer commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Focus duration must be at least one minute (got {0})")]
    InvalidFocusMinutes(u32),
}
