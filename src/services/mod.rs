//! External collaborators of the timer
//!
//! User-visible notifications and the desktop tooling behind them.

pub mod notifier;
pub mod system;

// Re-export main types
pub use notifier::{DesktopNotifier, LogNotifier, Notifier};
pub use system::check_notify_send_available;
