//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::state::DEFAULT_FOCUS_MINUTES;

/// Directory name under the platform data dir
const DATA_DIR_NAME: &str = "focus-timer";

/// Where notifications go
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotifierKind {
    /// Log lines only
    Log,
    /// Desktop popups through notify-send
    Desktop,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "focus-timer")]
#[command(about = "A focus timer daemon with restart-safe countdowns and a session log")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial focus session length in minutes
    #[arg(short = 'm', long, default_value_t = DEFAULT_FOCUS_MINUTES,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub focus_minutes: u32,

    /// Directory for the session log and timer state
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long, conflicts_with = "data_dir")]
    pub ephemeral: bool,

    /// Notification backend
    #[arg(long, value_enum, default_value_t = NotifierKind::Log)]
    pub notifier: NotifierKind,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// The explicit data dir, else the platform data dir, else `./focus-timer-data`
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(DATA_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from("focus-timer-data"))
        })
    }
}
