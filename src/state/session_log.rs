//! Focus session records and the append-only session log

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One completed or manually stopped focus run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    /// Wall-clock seconds between start and stop, not the configured length
    pub duration_sec: u64,
}

impl Session {
    /// Build the record for a run that started at `started_at` and stopped at `stopped_at`.
    ///
    /// The id is the stop time in epoch milliseconds.
    pub fn finished(started_at: DateTime<Utc>, stopped_at: DateTime<Utc>) -> Self {
        let elapsed_ms = (stopped_at - started_at).num_milliseconds().max(0);
        Self {
            id: stopped_at.timestamp_millis().to_string(),
            started_at,
            duration_sec: (elapsed_ms / 1000) as u64,
        }
    }
}

/// Session history, most recent first.
///
/// Sessions are only ever prepended or cleared all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    sessions: Vec<Session>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap sessions loaded from storage, assumed already most-recent-first
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    pub fn record(&mut self, session: Session) {
        self.sessions.insert(0, session);
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Total focused seconds for sessions that started on `now`'s calendar day,
    /// in `now`'s time zone.
    pub fn focused_seconds_on_day<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u64 {
        let tz = now.timezone();
        let day = now.date_naive();
        let Some(start) = day_start(&tz, day) else {
            return 0;
        };
        let end = day.succ_opt().and_then(|next| day_start(&tz, next));

        self.sessions
            .iter()
            .filter(|s| s.started_at >= start && end.map_or(true, |end| s.started_at < end))
            .map(|s| s.duration_sec)
            .sum()
    }
}

/// First instant of `day` in `tz`. Zones that skip midnight start the day an hour later.
fn day_start<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
