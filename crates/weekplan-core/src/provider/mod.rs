//! Calendar data provider interface.
//!
//! The provider owns event persistence; this crate only reads snapshots
//! and forwards user edits. Every operation may fail independently -- a
//! failure aborts that one operation and never corrupts coordinator state.

pub mod google;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::event::CalendarEvent;
use crate::week::WeekWindow;

pub use google::GoogleCalendarProvider;

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<WeekWindow> for TimeRange {
    fn from(week: WeekWindow) -> Self {
        let (start, end) = week.range_utc();
        Self { start, end }
    }
}

/// External calendar service.
pub trait CalendarProvider: Send + Sync {
    /// List events within a time range, in the provider's order.
    fn list_events(&self, range: TimeRange) -> Result<Vec<CalendarEvent>, ProviderError>;

    /// Create an event, returning it with the provider-assigned id.
    fn add_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, ProviderError>;

    /// Update an existing event in place.
    fn update_event(&self, event: &CalendarEvent) -> Result<(), ProviderError>;

    /// Delete an event by id.
    fn delete_event(&self, event_id: &str) -> Result<(), ProviderError>;
}
