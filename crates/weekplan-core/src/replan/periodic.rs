//! Periodic re-optimization loop.
//!
//! Fires a [`TriggerKind::PeriodicTick`] through the same coordinator gate
//! as manual and event-driven triggers, so mutual exclusion and cooldown
//! hold across all of them. Stopping the loop only prevents future ticks;
//! a worker already dispatched by the coordinator runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::event::CalendarEvent;
use crate::replan::coordinator::ReplanCoordinator;
use crate::replan::trigger::ReplanTrigger;

/// Default tick interval, matching the 5-minute background optimization
/// cadence of the desktop app.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Supplies the current event snapshot and tracked-task count at each tick.
pub type SnapshotFn = dyn Fn() -> (Vec<CalendarEvent>, usize) + Send;

/// Handle to the background tick loop.
pub struct AutoOptimizeLoop {
    running: Arc<AtomicBool>,
}

impl AutoOptimizeLoop {
    /// Start ticking every `interval`.
    ///
    /// The first tick fires after one full interval, not immediately.
    pub fn start(
        coordinator: Arc<ReplanCoordinator>,
        snapshot: Box<SnapshotFn>,
        interval: Duration,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        thread::spawn(move || {
            while sleep_while_running(&flag, interval) {
                let (events, tracked_tasks) = snapshot();
                let outcome = coordinator.request_replan(
                    ReplanTrigger::periodic("Periodic schedule re-optimization"),
                    &events,
                    tracked_tasks,
                );
                tracing::debug!(?outcome, "periodic tick");
            }
            tracing::debug!("auto-optimize loop stopped");
        });

        Self { running }
    }

    /// Start per the `[replan]` config: `None` when `auto_replan` is off,
    /// otherwise a loop ticking every `periodic_interval_secs`.
    pub fn from_config(
        config: &Config,
        coordinator: Arc<ReplanCoordinator>,
        snapshot: Box<SnapshotFn>,
    ) -> Option<Self> {
        if !config.replan.auto_replan {
            tracing::debug!("auto-replan disabled, not starting the tick loop");
            return None;
        }
        Some(Self::start(coordinator, snapshot, config.periodic_interval()))
    }

    /// Stop scheduling further ticks. Idempotent; does not cancel an
    /// in-flight replan worker.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for AutoOptimizeLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleep for `interval` in short slices, returning false as soon as the
/// flag flips so stop() takes effect promptly.
fn sleep_while_running(flag: &AtomicBool, interval: Duration) -> bool {
    let deadline = Instant::now() + interval;
    while Instant::now() < deadline {
        if !flag.load(Ordering::SeqCst) {
            return false;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        thread::sleep(remaining.min(Duration::from_millis(25)));
    }
    flag.load(Ordering::SeqCst)
}
