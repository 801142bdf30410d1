//! The focus timer engine
//!
//! Owns the single countdown, drives it with a [`Ticker`], records sessions
//! and keeps the key-value store in sync on a best-effort basis.

use std::{
    sync::{Arc, Mutex as StdMutex, PoisonError},
    time::Duration,
};

use chrono::Local;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::{
    session_log::{Session, SessionLog},
    timer_state::{Resume, Tick, TimerMachine, TimerSnapshot, TimerView},
};
use crate::{
    clock::Clock,
    error::TimerError,
    services::Notifier,
    storage::{load_json, save_json, KeyValueStore, SESSIONS_KEY, TIMER_STATE_KEY},
    tasks::{TickFlow, Ticker},
    utils::format_elapsed,
};

/// Countdown cadence
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopKind {
    Manual,
    Auto,
}

struct Core {
    machine: TimerMachine,
    log: SessionLog,
}

struct Inner {
    /// Held across persistence so writes land in transition order
    core: Mutex<Core>,
    ticker: StdMutex<Option<Ticker>>,
    view_tx: watch::Sender<TimerView>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

/// Single-countdown focus timer.
///
/// Commands are serialized; observers read [`TimerView`]s through
/// [`FocusTimer::view`] or [`FocusTimer::subscribe`]. Storage failures are
/// logged and never surface to callers. Dropping the timer cancels its ticker.
pub struct FocusTimer {
    inner: Arc<Inner>,
}

impl FocusTimer {
    /// Create an idle timer. Call [`FocusTimer::restore`] once before any command.
    pub fn new(
        focus_minutes: u32,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let machine = TimerMachine::new(focus_minutes);
        let (view_tx, _) = watch::channel(machine.view());

        Self {
            inner: Arc::new(Inner {
                core: Mutex::new(Core {
                    machine,
                    log: SessionLog::new(),
                }),
                ticker: StdMutex::new(None),
                view_tx,
                store,
                notifier,
                clock,
            }),
        }
    }

    /// Load the session log and resume a countdown that was running when the
    /// process last exited.
    ///
    /// A snapshot whose target already passed is discarded without recording
    /// a session.
    pub async fn restore(&self) -> Resume {
        let inner = &self.inner;
        let mut core = inner.core.lock().await;

        match load_json::<Vec<Session>>(inner.store.as_ref(), SESSIONS_KEY).await {
            Ok(Some(sessions)) => {
                info!("Loaded {} focus sessions", sessions.len());
                core.log = SessionLog::from_sessions(sessions);
            }
            Ok(None) => debug!("No stored focus sessions"),
            Err(e) => warn!("Failed to load focus sessions: {}", e),
        }

        let snapshot = match load_json::<TimerSnapshot>(inner.store.as_ref(), TIMER_STATE_KEY).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to load timer state: {}", e);
                None
            }
        };
        let Some(snapshot) = snapshot else {
            return Resume::NotRunning;
        };

        let outcome = core.machine.resume(&snapshot, inner.clock.now());
        match outcome {
            Resume::Resumed(seconds_left) => {
                info!("Resuming focus timer with {}s left", seconds_left);
                inner.publish(&core.machine);
                inner.save_snapshot(&core.machine).await;
                inner.spawn_ticker();
            }
            Resume::Expired => {
                info!("Focus timer expired while not running, discarding it");
                inner.clear_snapshot().await;
            }
            Resume::NotRunning => debug!("Stored timer state is not running"),
        }
        outcome
    }

    /// Begin a run at the configured length.
    ///
    /// Returns `false` if a run is already in progress.
    pub async fn start(&self) -> bool {
        let inner = &self.inner;
        let mut core = inner.core.lock().await;

        let Some(run) = core.machine.start(inner.clock.now()) else {
            debug!("Start ignored, timer already running");
            return false;
        };
        info!(
            "Focus timer started for {} minutes, ends at {}",
            core.machine.focus_minutes(),
            run.target_end
        );

        inner.publish(&core.machine);
        inner.save_snapshot(&core.machine).await;
        inner.spawn_ticker();
        true
    }

    /// End the current run early and return the recorded session.
    ///
    /// Returns `None` when idle.
    pub async fn stop(&self) -> Option<Session> {
        let inner = &self.inner;
        let mut core = inner.core.lock().await;

        if let Some(ticker) = inner.take_ticker() {
            ticker.cancel();
        }
        let session = core.machine.stop(inner.clock.now())?;
        inner.finish_run(&mut core, session.clone(), StopKind::Manual).await;
        Some(session)
    }

    /// Change the session length.
    ///
    /// Returns `Ok(false)` while running, leaving the length unchanged.
    pub async fn set_focus_minutes(&self, minutes: u32) -> Result<bool, TimerError> {
        let mut core = self.inner.core.lock().await;
        let applied = core.machine.set_focus_minutes(minutes)?;
        if applied {
            info!("Focus length set to {} minutes", minutes);
            self.inner.publish(&core.machine);
        } else {
            debug!("Focus length change ignored while running");
        }
        Ok(applied)
    }

    /// Drop the whole session history
    pub async fn clear_sessions(&self) {
        let mut core = self.inner.core.lock().await;
        info!("Clearing {} focus sessions", core.log.len());
        core.log.clear();
        self.inner.save_sessions(&core.log).await;
    }

    /// Stop ticking for process teardown.
    ///
    /// The run is not recorded and its snapshot stays, so the next
    /// [`FocusTimer::restore`] picks it up.
    pub fn shutdown(&self) {
        if let Some(ticker) = self.inner.take_ticker() {
            info!("Cancelling focus timer ticks for shutdown");
            ticker.cancel();
        }
    }

    pub fn view(&self) -> TimerView {
        *self.inner.view_tx.borrow()
    }

    /// Receiver updated on every transition and tick
    pub fn subscribe(&self) -> watch::Receiver<TimerView> {
        self.inner.view_tx.subscribe()
    }

    /// Recorded sessions, most recent first
    pub async fn sessions(&self) -> Vec<Session> {
        self.inner.core.lock().await.log.sessions().to_vec()
    }

    /// Seconds focused in sessions that started today, local time
    pub async fn total_focused_today(&self) -> u64 {
        let now = self.inner.clock.now().with_timezone(&Local);
        self.inner.core.lock().await.log.focused_seconds_on_day(&now)
    }

    /// Whether a tick task is currently scheduled
    pub fn is_ticking(&self) -> bool {
        self.inner
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |t| !t.is_finished())
    }
}

impl Inner {
    fn publish(&self, machine: &TimerMachine) {
        self.view_tx.send_replace(machine.view());
    }

    fn take_ticker(&self) -> Option<Ticker> {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn spawn_ticker(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let ticker = Ticker::spawn(TICK_PERIOD, move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(inner) => inner.on_tick().await,
                    None => TickFlow::Break,
                }
            }
        });

        let previous = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(ticker);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    async fn on_tick(&self) -> TickFlow {
        let mut core = self.core.lock().await;

        match core.machine.tick(self.clock.now()) {
            None => TickFlow::Break,
            Some(Tick::Continue(seconds_left)) => {
                debug!("Focus timer tick, {}s left", seconds_left);
                self.publish(&core.machine);
                self.save_snapshot(&core.machine).await;
                TickFlow::Continue
            }
            Some(Tick::Expired(session)) => {
                // this task is the ticker; let it end on its own
                if let Some(ticker) = self.take_ticker() {
                    ticker.detach();
                }
                self.finish_run(&mut core, session, StopKind::Auto).await;
                TickFlow::Break
            }
        }
    }

    async fn finish_run(&self, core: &mut Core, session: Session, kind: StopKind) {
        info!(
            "Focus session {} recorded: {}s ({:?} stop)",
            session.id, session.duration_sec, kind
        );
        core.log.record(session.clone());
        self.publish(&core.machine);
        self.save_sessions(&core.log).await;
        self.clear_snapshot().await;

        match kind {
            StopKind::Auto => self
                .notifier
                .notify("Time's up!", "Your focus session has ended!"),
            StopKind::Manual => self.notifier.notify(
                "Session saved",
                &format!("Duration: {}", format_elapsed(session.duration_sec)),
            ),
        }
    }

    async fn save_snapshot(&self, machine: &TimerMachine) {
        let Some(snapshot) = machine.snapshot() else {
            return;
        };
        if let Err(e) = save_json(self.store.as_ref(), TIMER_STATE_KEY, &snapshot).await {
            warn!("Failed to save timer state: {}", e);
        }
    }

    async fn clear_snapshot(&self) {
        if let Err(e) = self.store.remove(TIMER_STATE_KEY).await {
            warn!("Failed to clear timer state: {}", e);
        }
    }

    async fn save_sessions(&self, log: &SessionLog) {
        if let Err(e) = save_json(self.store.as_ref(), SESSIONS_KEY, log.sessions()).await {
            warn!("Failed to save focus sessions: {}", e);
        }
    }
}
