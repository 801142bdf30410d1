//! Focus timer state machine
//!
//! Pure transitions over explicit timestamps. The async engine in
//! [`super::focus_timer`] feeds it the clock and persists the results.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::session_log::Session;
use crate::error::TimerError;

/// Default session length in minutes
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// Session lengths offered to timer screens
pub const PRESET_MINUTES: [u32; 6] = [15, 20, 25, 30, 45, 60];

/// Timestamps of the run in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRun {
    pub started_at: DateTime<Utc>,
    pub target_end: DateTime<Utc>,
}

impl ActiveRun {
    /// Seconds until the target, rounded to the nearest second, never negative
    pub fn remaining_rounded(&self, now: DateTime<Utc>) -> u64 {
        let ms = (self.target_end - now).num_milliseconds().max(0);
        ((ms + 500) / 1000) as u64
    }
}

/// At most one run exists; an idle timer carries no run timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running(ActiveRun),
}

/// Result of a one-second tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Still running with this many seconds left
    Continue(u64),
    /// The countdown reached zero; the run was stopped and recorded
    Expired(Session),
}

/// Outcome of reconciling a persisted snapshot at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Snapshot was not a running timer
    NotRunning,
    /// Countdown continues with this many seconds left
    Resumed(u64),
    /// Target passed while the process was down; snapshot must be discarded
    Expired,
}

/// Serializable view of the timer for observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub running: bool,
    pub seconds_left: u64,
    pub focus_minutes: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub target_end_time: Option<DateTime<Utc>>,
}

/// Record persisted while a run is in progress, the only state that survives a restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub running: bool,
    pub seconds_left: u64,
    pub focus_minutes: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub target_end_time: Option<DateTime<Utc>>,
}

/// Single-run countdown state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerMachine {
    focus_minutes: u32,
    seconds_left: u64,
    phase: Phase,
}

impl TimerMachine {
    /// Create an idle timer. A zero length falls back to the default.
    pub fn new(focus_minutes: u32) -> Self {
        let focus_minutes = if focus_minutes == 0 {
            DEFAULT_FOCUS_MINUTES
        } else {
            focus_minutes
        };
        Self {
            focus_minutes,
            seconds_left: full_length(focus_minutes),
            phase: Phase::Idle,
        }
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Change the session length.
    ///
    /// Returns `Ok(false)` without changing anything while a run is in progress.
    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<bool, TimerError> {
        if minutes == 0 {
            return Err(TimerError::InvalidFocusMinutes(minutes));
        }
        if self.is_running() {
            return Ok(false);
        }
        self.focus_minutes = minutes;
        self.seconds_left = full_length(minutes);
        Ok(true)
    }

    /// Begin a run at `now`. Returns `None` if one is already in progress.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<ActiveRun> {
        if self.is_running() {
            return None;
        }
        let run = ActiveRun {
            started_at: now,
            target_end: now + Duration::seconds(full_length(self.focus_minutes) as i64),
        };
        self.seconds_left = full_length(self.focus_minutes);
        self.phase = Phase::Running(run);
        Some(run)
    }

    /// Advance the countdown by one second, reconciled against the wall clock.
    ///
    /// Returns `None` when idle.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Tick> {
        let Phase::Running(run) = self.phase else {
            return None;
        };
        let by_clock = run.remaining_rounded(now);
        if self.seconds_left <= 1 || by_clock == 0 {
            return self.stop(now).map(Tick::Expired);
        }
        self.seconds_left = (self.seconds_left - 1).min(by_clock);
        Some(Tick::Continue(self.seconds_left))
    }

    /// End the current run at `now` and return its session record.
    ///
    /// Returns `None` when idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Session> {
        let Phase::Running(run) = self.phase else {
            return None;
        };
        self.phase = Phase::Idle;
        self.seconds_left = full_length(self.focus_minutes);
        Some(Session::finished(run.started_at, now))
    }

    /// Reconcile a persisted snapshot with the current time.
    ///
    /// Ignored if a run is already in progress here.
    pub fn resume(&mut self, snapshot: &TimerSnapshot, now: DateTime<Utc>) -> Resume {
        let Some(target_end) = snapshot.target_end_time else {
            return Resume::NotRunning;
        };
        if !snapshot.running || self.is_running() {
            return Resume::NotRunning;
        }

        let focus_minutes = if snapshot.focus_minutes == 0 {
            self.focus_minutes
        } else {
            snapshot.focus_minutes
        };
        let remaining = whole_seconds_until(target_end, now);
        if remaining == 0 {
            return Resume::Expired;
        }

        let started_at = match snapshot.started_at {
            Some(started_at) => started_at,
            None => match target_end
                .checked_sub_signed(Duration::seconds(full_length(focus_minutes) as i64))
            {
                Some(started_at) => started_at,
                // no representable start; nothing sensible to resume
                None => return Resume::Expired,
            },
        };
        let run = ActiveRun {
            started_at,
            target_end,
        };

        self.focus_minutes = focus_minutes;
        self.seconds_left = remaining;
        self.phase = Phase::Running(run);
        Resume::Resumed(remaining)
    }

    pub fn view(&self) -> TimerView {
        let run = match self.phase {
            Phase::Running(run) => Some(run),
            Phase::Idle => None,
        };
        TimerView {
            running: run.is_some(),
            seconds_left: self.seconds_left,
            focus_minutes: self.focus_minutes,
            started_at: run.map(|r| r.started_at),
            target_end_time: run.map(|r| r.target_end),
        }
    }

    /// The record to persist, present only while running
    pub fn snapshot(&self) -> Option<TimerSnapshot> {
        let Phase::Running(run) = self.phase else {
            return None;
        };
        Some(TimerSnapshot {
            running: true,
            seconds_left: self.seconds_left,
            focus_minutes: self.focus_minutes,
            started_at: Some(run.started_at),
            target_end_time: Some(run.target_end),
        })
    }
}

impl Default for TimerMachine {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES)
    }
}

fn full_length(focus_minutes: u32) -> u64 {
    u64::from(focus_minutes) * 60
}

/// Whole seconds from `now` until `target`, never negative
fn whole_seconds_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    ((target - now).num_milliseconds().max(0) / 1000) as u64
}
