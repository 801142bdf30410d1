#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, Utc};
use focus_timer::{
    clock::Clock,
    services::Notifier,
    state::{FocusTimer, TimerSnapshot},
    storage::{MemoryStore, TIMER_STATE_KEY},
};
use tokio::time::Instant;

/// Wall clock that advances with tokio's (pausable) clock
pub struct TokioClock {
    origin_wall: DateTime<Utc>,
    origin: Instant,
}

impl TokioClock {
    /// Starts at local noon today so runs never cross midnight
    pub fn at_local_noon() -> Self {
        let noon = Local::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .earliest()
            .unwrap();
        Self {
            origin_wall: noon.with_timezone(&Utc),
            origin: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        self.origin_wall + Duration::from_std(self.origin.elapsed()).unwrap()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<TokioClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            notifier: Arc::new(RecordingNotifier::default()),
            clock: Arc::new(TokioClock::at_local_noon()),
        }
    }

    pub fn timer(&self, focus_minutes: u32) -> FocusTimer {
        FocusTimer::new(
            focus_minutes,
            self.store.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn stored_snapshot(&self) -> Option<TimerSnapshot> {
        self.store
            .peek(TIMER_STATE_KEY)
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }
}
