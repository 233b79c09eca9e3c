//! Core library for the weekplan calendar: week-view layout and replan
//! coordination.
//!
//! The crate has two halves. The layout half is pure data transformation:
//! [`week`] groups an event snapshot into Monday-anchored per-day buckets
//! and [`layout`] packs each day's overlapping events into display lanes.
//! The coordination half keeps background work sane around a
//! single-threaded presentation loop: [`replan`] gates optimizer runs
//! behind mutual exclusion and a cooldown, [`ui`] marshals results back to
//! the presentation thread as posted closures, and [`loader`] brings up
//! slow backends off-thread with exactly-once completion delivery.
//!
//! [`provider`] and [`optimizer`] are the outward seams: calendar storage
//! and the planning backend live behind traits so the rest of the crate
//! never blocks on, or knows about, a concrete service.

pub mod config;
pub mod error;
pub mod event;
pub mod layout;
pub mod loader;
pub mod optimizer;
pub mod provider;
pub mod replan;
pub mod ui;
pub mod view;
pub mod week;

pub use config::Config;
pub use error::{CoreError, Result};
pub use event::{CalendarEvent, EventTime, MANAGED_TAG};
pub use layout::{pack, LaneLayout, LaneSlot};
pub use loader::AsyncLoader;
pub use optimizer::{CapacityWarning, Optimizer, PriorityAnalysis, ReplanReport, Severity};
pub use provider::{CalendarProvider, GoogleCalendarProvider, TimeRange};
pub use replan::{
    AutoOptimizeLoop, RejectReason, ReplanCoordinator, ReplanOutcome, ReplanResult, ReplanTrigger,
    TriggerKind,
};
pub use ui::{UiHandle, UiQueue};
pub use view::{RefreshSummary, WeekLayout, WeekView};
pub use week::{DayBuckets, WeekWindow};
