//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Session, TimerView};

/// Response for timer commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerView) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
            session: None,
        }
    }

    pub fn running(message: String, timer: TimerView) -> Self {
        Self::new("running", message, timer)
    }

    pub fn idle(message: String, timer: TimerView) -> Self {
        Self::new("idle", message, timer)
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }
}

/// Body of PUT /focus-minutes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusMinutesRequest {
    pub minutes: u32,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Status response for timer screens and the global indicator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    /// Countdown as `MM:SS`
    pub display: String,
    pub focused_today_seconds: u64,
    pub session_count: usize,
    pub presets: Vec<u32>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Session history response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub count: usize,
    pub sessions: Vec<Session>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
