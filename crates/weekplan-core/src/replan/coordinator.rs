//! The replan coordinator: a two-state (Idle/Running) gate in front of the
//! optimizer's replan entry point.
//!
//! One logical instance exists per application session. All admissibility
//! checks and the Idle -> Running transition happen under a single mutex
//! guard, so two triggers arriving simultaneously can never both dispatch.
//! Completion crosses back to the presentation thread through the UI queue;
//! the refresh it triggers carries `skip_replan = true`, which is what
//! keeps the coordinator from re-triggering itself off its own side
//! effects.

use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{DateTime, Duration, Utc};

use crate::event::CalendarEvent;
use crate::optimizer::Optimizer;
use crate::replan::trigger::{
    RejectReason, ReplanCompletion, ReplanOutcome, ReplanResult, ReplanTrigger, TriggerKind,
};
use crate::ui::UiHandle;

/// Default minimum quiet period between replan runs.
pub const DEFAULT_COOLDOWN_SECS: i64 = 5;

/// Callback invoked (on the presentation thread) when a worker finishes.
pub type CompletionCallback = Arc<dyn Fn(ReplanCompletion) + Send + Sync>;

/// Mutable gate state. `last_completed_at` only ever advances, and only the
/// coordinator writes it: once when a run dispatches, once when it finishes.
struct GateState {
    running: bool,
    last_completed_at: Option<DateTime<Utc>>,
}

/// Coordinates background replanning.
pub struct ReplanCoordinator {
    gate: Arc<Mutex<GateState>>,
    cooldown: Duration,
    optimizer: Arc<dyn Optimizer>,
    ui: UiHandle,
    on_complete: CompletionCallback,
}

impl ReplanCoordinator {
    pub fn new(
        optimizer: Arc<dyn Optimizer>,
        ui: UiHandle,
        on_complete: CompletionCallback,
    ) -> Self {
        Self {
            gate: Arc::new(Mutex::new(GateState {
                running: false,
                last_completed_at: None,
            })),
            cooldown: Duration::seconds(DEFAULT_COOLDOWN_SECS),
            optimizer,
            ui,
            on_complete,
        }
    }

    /// Override the cooldown window (tests use a milliseconds-scale one).
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_running(&self) -> bool {
        self.gate.lock().unwrap().running
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.gate.lock().unwrap().last_completed_at
    }

    /// Ask for a replan. Returns immediately.
    ///
    /// Admissibility is evaluated in this order, all under one lock:
    ///
    /// 1. already running -> `AlreadyRunning`
    /// 2. inside the cooldown window -> `Cooldown`, regardless of trigger
    ///    severity (the cooldown is an unconditional anti-thrash guard)
    /// 3. zero managed events and zero tracked tasks -> `NothingToReplan`,
    ///    independent of severity
    /// 4. accept if the trigger is `CapacityCritical` or at least one
    ///    managed event exists; otherwise `NothingToReplan`
    ///
    /// On acceptance the state flips to Running inside the same lock scope
    /// and a worker thread is dispatched.
    pub fn request_replan(
        &self,
        trigger: ReplanTrigger,
        events: &[CalendarEvent],
        tracked_tasks: usize,
    ) -> ReplanOutcome {
        let now = Utc::now();
        let managed = events.iter().filter(|ev| ev.is_managed()).count();

        {
            let mut gate = self.gate.lock().unwrap();

            if gate.running {
                return self.reject(&trigger, RejectReason::AlreadyRunning);
            }

            if let Some(last) = gate.last_completed_at {
                if now - last < self.cooldown {
                    return self.reject(&trigger, RejectReason::Cooldown);
                }
            }

            if managed == 0 && tracked_tasks == 0 {
                return self.reject(&trigger, RejectReason::NothingToReplan);
            }

            if trigger.kind != TriggerKind::CapacityCritical && managed == 0 {
                return self.reject(&trigger, RejectReason::NothingToReplan);
            }

            // Check-and-set, not check then set: the transition happens
            // before the lock is released.
            gate.running = true;
            gate.last_completed_at = Some(now);
        }

        tracing::info!(
            trigger = trigger.kind.as_str(),
            reason = %trigger.reason,
            managed,
            tracked_tasks,
            "replan accepted"
        );
        self.dispatch(trigger);
        ReplanOutcome::Accepted
    }

    fn reject(&self, trigger: &ReplanTrigger, reason: RejectReason) -> ReplanOutcome {
        tracing::debug!(
            trigger = trigger.kind.as_str(),
            reject = ?reason,
            "replan rejected"
        );
        ReplanOutcome::Rejected(reason)
    }

    /// Hand the accepted trigger to a worker thread.
    fn dispatch(&self, trigger: ReplanTrigger) {
        let gate = Arc::clone(&self.gate);
        let optimizer = Arc::clone(&self.optimizer);
        let ui = self.ui.clone();
        let on_complete = Arc::clone(&self.on_complete);

        thread::spawn(move || {
            let result = match optimizer.auto_replan(&trigger.reason) {
                Ok(report) if report.is_noop() => ReplanResult::NoTasks,
                Ok(report) => ReplanResult::Success {
                    calendar_tasks: report.calendar_tasks,
                    scheduler_tasks: report.scheduler_tasks,
                },
                Err(err) => {
                    tracing::warn!(error = %err, "replan worker failed");
                    ReplanResult::Failure {
                        message: err.to_string(),
                    }
                }
            };

            // Release the gate and arm the cooldown unconditionally --
            // failures too, so a broken backend cannot be retried in a
            // tight loop.
            let at = Utc::now();
            {
                let mut gate = gate.lock().unwrap();
                gate.running = false;
                gate.last_completed_at = Some(at);
            }

            let completion = ReplanCompletion {
                trigger: trigger.kind,
                result,
                at,
            };
            ui.post(move || on_complete(completion));
        });
    }
}
