//! Interface to the AI/heuristic schedule optimizer.
//!
//! The optimizer decides where managed events go and reports capacity
//! pressure; this crate only decides whether and when to ask it. All calls
//! through [`Optimizer`] are potentially slow and happen from worker
//! threads only -- never on the presentation thread.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

/// Severity of a capacity warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// A capacity warning for a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityWarning {
    pub severity: Severity,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub message: String,
}

impl CapacityWarning {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// A day where scheduled work exceeds what fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub day: NaiveDate,
    pub scheduled_minutes: i64,
    pub available_minutes: i64,
}

/// The single highest-priority candidate, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTask {
    pub id: String,
    pub title: String,
    pub deadline: Option<DateTime<Utc>>,
}

/// Result of a priority analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityAnalysis {
    pub top_priority: Option<TopTask>,
    #[serde(default)]
    pub bottlenecks: Vec<Bottleneck>,
}

/// What an accepted replan run actually did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplanReport {
    /// Managed calendar events the optimizer moved.
    pub calendar_tasks: usize,
    /// Tracked (not yet placed) tasks the optimizer scheduled.
    pub scheduler_tasks: usize,
}

impl ReplanReport {
    pub fn total_moved(&self) -> usize {
        self.calendar_tasks + self.scheduler_tasks
    }

    /// A run that found nothing to move.
    pub fn is_noop(&self) -> bool {
        self.total_moved() == 0
    }
}

/// External optimizer entry points.
///
/// Implementations wrap whatever backend actually plans (remote AI model,
/// local model, rule engine). They must be shareable across worker threads.
pub trait Optimizer: Send + Sync {
    /// Analyze capacity over the next `lookahead_days` days.
    fn analyze_capacity(&self, lookahead_days: u32) -> Result<Vec<CapacityWarning>, OptimizerError>;

    /// Find the single top-priority candidate and current bottlenecks.
    fn analyze_priorities(&self) -> Result<PriorityAnalysis, OptimizerError>;

    /// Re-plan managed events. `reason` is the human-readable trigger
    /// explanation, passed through for the backend's own logging.
    fn auto_replan(&self, reason: &str) -> Result<ReplanReport, OptimizerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Normal);
    }

    #[test]
    fn replan_report_noop() {
        let report = ReplanReport {
            calendar_tasks: 0,
            scheduler_tasks: 0,
        };
        assert!(report.is_noop());

        let report = ReplanReport {
            calendar_tasks: 2,
            scheduler_tasks: 1,
        };
        assert!(!report.is_noop());
        assert_eq!(report.total_moved(), 3);
    }
}
