//! Replan coordination: triggers, the admissibility gate, and the periodic
//! re-optimization loop.

mod coordinator;
mod periodic;
mod trigger;

pub use coordinator::{CompletionCallback, ReplanCoordinator, DEFAULT_COOLDOWN_SECS};
pub use periodic::{AutoOptimizeLoop, SnapshotFn, DEFAULT_INTERVAL};
pub use trigger::{
    RejectReason, ReplanCompletion, ReplanOutcome, ReplanResult, ReplanTrigger, TriggerKind,
};
