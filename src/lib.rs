//! Focus Timer - a single-timer focus daemon
//!
//! This library provides a pomodoro-style countdown that survives process
//! restarts, an append-only log of focus sessions, and the HTTP surface
//! timer screens use to drive it.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{StoreError, TimerError};
pub use state::{AppState, FocusTimer, Session, TimerView};
pub use storage::KeyValueStore;
pub use utils::signals::shutdown_signal;
