//! Periodic tick task with an owned cancellation handle

use std::{future::Future, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Whether the ticker keeps going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Break,
}

/// Handle to a spawned periodic task.
///
/// Dropping the handle aborts the task, so repeating work never outlives
/// its owner. The first tick fires one period after spawning.
#[derive(Debug)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn `on_tick` every `period` until it returns [`TickFlow::Break`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickFlow> + Send + 'static,
    {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            loop {
                interval.tick().await;
                if on_tick().await == TickFlow::Break {
                    debug!("Ticker finished");
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Abort the task
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Release the handle without aborting, for use from inside the final tick
    pub fn detach(mut self) {
        self.handle.take();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };
    use tokio::time::sleep;

    fn counting(count: &Arc<AtomicU32>, stop_at: u32) -> Ticker {
        let count = Arc::clone(count);
        Ticker::spawn(Duration::from_secs(1), move || {
            let count = Arc::clone(&count);
            async move {
                if count.fetch_add(1, Ordering::SeqCst) + 1 >= stop_at {
                    TickFlow::Break
                } else {
                    TickFlow::Continue
                }
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let count = Arc::new(AtomicU32::new(0));
        let _ticker = counting(&count, u32::MAX);

        sleep(Duration::from_millis(999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(5_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_ends_task() {
        let count = Arc::new(AtomicU32::new(0));
        let ticker = counting(&count, 3);

        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_stop_ticking() {
        let count = Arc::new(AtomicU32::new(0));
        let ticker = counting(&count, u32::MAX);
        sleep(Duration::from_millis(2_500)).await;
        ticker.cancel();
        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        let dropped = Arc::new(AtomicU32::new(0));
        drop(counting(&dropped, u32::MAX));
        sleep(Duration::from_secs(10)).await;
        assert_eq!(dropped.load(Ordering::SeqCst), 0);
    }
}
