//! State management module
//!
//! The countdown state machine, the session log, the async engine that owns
//! both, and the shared state handed to the HTTP layer.

pub mod app_state;
pub mod focus_timer;
pub mod session_log;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use focus_timer::FocusTimer;
pub use session_log::{Session, SessionLog};
pub use timer_state::{
    Resume, TimerMachine, TimerSnapshot, TimerView, DEFAULT_FOCUS_MINUTES, PRESET_MINUTES,
};
