//! Trigger and outcome types for replan coordination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of condition asked for a replan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// An event was created, moved, or deleted.
    EventMutated,
    /// The capacity analysis reported a critical overload.
    CapacityCritical,
    /// The user asked for a shuffle/optimize explicitly.
    ManualRequest,
    /// The background re-optimization loop ticked.
    PeriodicTick,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventMutated => "event_mutated",
            Self::CapacityCritical => "capacity_critical",
            Self::ManualRequest => "manual_request",
            Self::PeriodicTick => "periodic_tick",
        }
    }
}

/// A replan request: the kind of condition plus a human-readable reason
/// that is passed through to the optimizer backend verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplanTrigger {
    pub kind: TriggerKind,
    pub reason: String,
}

impl ReplanTrigger {
    pub fn new(kind: TriggerKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn event_mutated(reason: impl Into<String>) -> Self {
        Self::new(TriggerKind::EventMutated, reason)
    }

    pub fn capacity_critical(reason: impl Into<String>) -> Self {
        Self::new(TriggerKind::CapacityCritical, reason)
    }

    pub fn manual(reason: impl Into<String>) -> Self {
        Self::new(TriggerKind::ManualRequest, reason)
    }

    pub fn periodic(reason: impl Into<String>) -> Self {
        Self::new(TriggerKind::PeriodicTick, reason)
    }
}

/// Why a trigger was turned away.
///
/// These are routine, debounce-style outcomes -- logged at debug level and
/// never surfaced as user-facing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A replan worker is already in flight.
    AlreadyRunning,
    /// The minimum quiet period since the last run has not elapsed.
    Cooldown,
    /// No managed events and no tracked tasks: nothing a replan could move.
    NothingToReplan,
}

/// Immediate answer from [`request_replan`](super::ReplanCoordinator::request_replan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "reason")]
pub enum ReplanOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl ReplanOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Result reported when a replan worker finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ReplanResult {
    /// The optimizer moved something.
    Success {
        calendar_tasks: usize,
        scheduler_tasks: usize,
    },
    /// The optimizer ran but found nothing to move.
    NoTasks,
    /// The worker failed; the message is user-presentable.
    Failure { message: String },
}

/// Completion notice delivered on the presentation thread.
///
/// The refresh this triggers must pass `skip_replan = true` -- that is what
/// breaks the refresh -> replan -> refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplanCompletion {
    pub trigger: TriggerKind,
    pub result: ReplanResult,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accepted_query() {
        assert!(ReplanOutcome::Accepted.is_accepted());
        assert!(!ReplanOutcome::Rejected(RejectReason::Cooldown).is_accepted());
    }

    #[test]
    fn trigger_constructors_carry_reason() {
        let t = ReplanTrigger::manual("Manual shuffle requested");
        assert_eq!(t.kind, TriggerKind::ManualRequest);
        assert_eq!(t.reason, "Manual shuffle requested");
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let json = serde_json::to_value(ReplanResult::NoTasks).unwrap();
        assert_eq!(json["status"], "no_tasks");

        let json = serde_json::to_value(ReplanResult::Failure {
            message: "backend down".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["message"], "backend down");
    }
}
