//! Shared state handed to the HTTP handlers

use std::{sync::Arc, time::Instant};

use super::FocusTimer;
use crate::utils::format_uptime;

/// The timer plus server metadata
pub struct AppState {
    pub timer: Arc<FocusTimer>,
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(timer: Arc<FocusTimer>, port: u16, host: String) -> Self {
        Self {
            timer,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}
