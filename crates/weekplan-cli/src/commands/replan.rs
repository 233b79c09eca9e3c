use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use clap::Subcommand;
use weekplan_core::error::OptimizerError;
use weekplan_core::optimizer::{
    Bottleneck, CapacityWarning, Optimizer, PriorityAnalysis, ReplanReport, Severity, TopTask,
};
use weekplan_core::replan::ReplanCompletion;
use weekplan_core::ui::UiQueue;
use weekplan_core::{
    CalendarEvent, Config, ReplanCoordinator, ReplanOutcome, ReplanResult, ReplanTrigger,
};

/// Minutes of timed work per day before a warning, then a critical.
const WARN_MINUTES: i64 = 8 * 60;
const CRITICAL_MINUTES: i64 = 10 * 60;

#[derive(Subcommand)]
pub enum ReplanAction {
    /// Run one coordinated replan over a JSON event snapshot
    Run {
        /// JSON file with an array of calendar events
        file: PathBuf,
        /// Trigger explanation
        #[arg(long, default_value = "Manual replan from CLI")]
        reason: String,
        /// Scheduler tasks not yet placed on the calendar
        #[arg(long, default_value_t = 0)]
        tracked_tasks: usize,
    },
    /// Analyze capacity pressure in a JSON event snapshot
    Capacity {
        /// JSON file with an array of calendar events
        file: PathBuf,
        /// Days of lookahead (defaults to the configured value)
        #[arg(long)]
        days: Option<u32>,
    },
}

pub fn run(action: ReplanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReplanAction::Run {
            file,
            reason,
            tracked_tasks,
        } => {
            let events = load_events(&file)?;
            let config = Config::load();

            let optimizer = build_optimizer(&config, events.clone())?;
            let (queue, handle) = UiQueue::new();
            let coordinator = ReplanCoordinator::new(
                optimizer,
                handle,
                Arc::new(print_completion),
            )
            .with_cooldown(config.cooldown());

            let outcome =
                coordinator.request_replan(ReplanTrigger::manual(reason), &events, tracked_tasks);
            match outcome {
                ReplanOutcome::Accepted => {
                    // Block until the worker's completion lands.
                    queue.drain_for(Duration::from_secs(60));
                }
                ReplanOutcome::Rejected(reject) => {
                    println!("rejected: {reject:?}");
                }
            }
        }
        ReplanAction::Capacity { file, days } => {
            let events = load_events(&file)?;
            let config = Config::load();
            let optimizer = build_optimizer(&config, events)?;

            let warnings = optimizer.analyze_capacity(days.unwrap_or(config.replan.lookahead_days))?;
            if warnings.is_empty() {
                println!("no capacity pressure");
            } else {
                for w in &warnings {
                    println!(
                        "{:8} {}  {}",
                        w.severity.as_str(),
                        w.window_start.format("%Y-%m-%d"),
                        w.message
                    );
                }
            }
        }
    }
    Ok(())
}

fn load_events(file: &PathBuf) -> Result<Vec<CalendarEvent>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Pick the optimizer backend per `[model]`.
///
/// The CLI bundles only the rule heuristics; `backend = "local"` falls back
/// to them when `auto_fallback` allows it and errors otherwise.
fn build_optimizer(
    config: &Config,
    events: Vec<CalendarEvent>,
) -> Result<Arc<dyn Optimizer>, OptimizerError> {
    match config.model.backend.as_str() {
        "rule" => Ok(Arc::new(RuleOptimizer { events })),
        "local" => {
            if config.model.auto_fallback {
                eprintln!(
                    "model '{}' is not bundled with the CLI, using rule heuristics",
                    config.model.name
                );
                Ok(Arc::new(RuleOptimizer { events }))
            } else {
                Err(OptimizerError::Unavailable(format!(
                    "local model '{}' is not bundled with the CLI",
                    config.model.name
                )))
            }
        }
        other => Err(OptimizerError::Unavailable(format!(
            "unknown model backend '{other}'"
        ))),
    }
}

fn print_completion(completion: ReplanCompletion) {
    match completion.result {
        ReplanResult::Success {
            calendar_tasks,
            scheduler_tasks,
        } => println!(
            "replanned: {calendar_tasks} calendar task(s), {scheduler_tasks} scheduler task(s)"
        ),
        ReplanResult::NoTasks => println!("nothing to move"),
        ReplanResult::Failure { message } => println!("replan failed: {message}"),
    }
}

/// Heuristic optimizer over a static snapshot.
///
/// The lookahead window is anchored at the snapshot's earliest event, so
/// saved snapshots from any week analyze the same way live ones do.
struct RuleOptimizer {
    events: Vec<CalendarEvent>,
}

impl RuleOptimizer {
    /// Total timed minutes per day, earliest day first.
    fn minutes_per_day(&self) -> Vec<(NaiveDate, i64)> {
        let mut per_day: Vec<(NaiveDate, i64)> = Vec::new();
        for ev in &self.events {
            let Some(start) = ev.start() else { continue };
            let date = start.date_naive();
            let minutes = ev.duration_minutes();
            match per_day.iter_mut().find(|(d, _)| *d == date) {
                Some((_, total)) => *total += minutes,
                None => per_day.push((date, minutes)),
            }
        }
        per_day.sort_by_key(|&(d, _)| d);
        per_day
    }
}

impl Optimizer for RuleOptimizer {
    fn analyze_capacity(&self, lookahead_days: u32) -> Result<Vec<CapacityWarning>, OptimizerError> {
        let per_day = self.minutes_per_day();
        let Some(&(anchor, _)) = per_day.first() else {
            return Ok(Vec::new());
        };
        let horizon = anchor + chrono::Duration::days(lookahead_days as i64);

        let mut warnings = Vec::new();
        for (date, minutes) in per_day {
            if date >= horizon || minutes < WARN_MINUTES {
                continue;
            }
            let severity = if minutes >= CRITICAL_MINUTES {
                Severity::Critical
            } else {
                Severity::Warning
            };
            let midnight = Utc
                .with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0)
                .single()
                .ok_or_else(|| OptimizerError::Failed("invalid date".into()))?;
            warnings.push(CapacityWarning {
                severity,
                window_start: midnight,
                window_end: midnight + chrono::Duration::days(1),
                message: format!(
                    "{date}: {:.1}h of scheduled work",
                    minutes as f64 / 60.0
                ),
            });
        }
        Ok(warnings)
    }

    fn analyze_priorities(&self) -> Result<PriorityAnalysis, OptimizerError> {
        let top_priority = self
            .events
            .iter()
            .filter(|ev| ev.is_managed())
            .filter_map(|ev| ev.start().map(|s| (ev, s)))
            .min_by_key(|&(_, s)| s)
            .map(|(ev, s)| TopTask {
                id: ev.id.clone(),
                title: ev.title.clone(),
                deadline: Some(s),
            });

        let bottlenecks = self
            .minutes_per_day()
            .into_iter()
            .filter(|&(_, minutes)| minutes > WARN_MINUTES)
            .map(|(day, scheduled_minutes)| Bottleneck {
                day,
                scheduled_minutes,
                available_minutes: WARN_MINUTES,
            })
            .collect();

        Ok(PriorityAnalysis {
            top_priority,
            bottlenecks,
        })
    }

    fn auto_replan(&self, _reason: &str) -> Result<ReplanReport, OptimizerError> {
        // Dry-run: report what a real backend would pick up.
        let managed = self.events.iter().filter(|ev| ev.is_managed()).count();
        Ok(ReplanReport {
            calendar_tasks: managed,
            scheduler_tasks: 0,
        })
    }
}
