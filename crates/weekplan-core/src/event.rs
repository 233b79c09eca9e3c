//! Calendar event snapshot types.
//!
//! Events are immutable per refresh cycle: the presentation layer owns the
//! snapshot and both the lane packer and the replan coordinator read it
//! without mutating it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Title prefix marking an event as AI-managed (movable by the replanner).
pub const MANAGED_TAG: &str = "[Task]";

/// When an event occupies the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum EventTime {
    /// A timed event with concrete start and end instants.
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// An all-day event, anchored to a calendar date.
    AllDay { date: NaiveDate },
}

/// A single calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Identifier, unique within the provider.
    pub id: String,
    pub title: String,
    pub time: EventTime,
    /// Explicitly flagged as AI-managed (in addition to the title tag).
    #[serde(default)]
    pub managed: bool,
}

impl CalendarEvent {
    /// Create a timed event.
    pub fn timed(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: EventTime::Timed { start, end },
            managed: false,
        }
    }

    /// Create an all-day event.
    pub fn all_day(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: EventTime::AllDay { date },
            managed: false,
        }
    }

    /// Mark as AI-managed.
    pub fn with_managed(mut self, managed: bool) -> Self {
        self.managed = managed;
        self
    }

    /// Whether the replanner may move this event.
    ///
    /// True when explicitly flagged or when the title carries the
    /// [`MANAGED_TAG`] prefix (how task events round-trip through the
    /// calendar provider).
    pub fn is_managed(&self) -> bool {
        self.managed || self.title.starts_with(MANAGED_TAG)
    }

    /// Start instant for timed events.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self.time {
            EventTime::Timed { start, .. } => Some(start),
            EventTime::AllDay { .. } => None,
        }
    }

    /// End instant for timed events.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        match self.time {
            EventTime::Timed { end, .. } => Some(end),
            EventTime::AllDay { .. } => None,
        }
    }

    /// Duration in minutes; zero for all-day events.
    pub fn duration_minutes(&self) -> i64 {
        match self.time {
            EventTime::Timed { start, end } => (end - start).num_minutes(),
            EventTime::AllDay { .. } => 0,
        }
    }

    /// Check if two timed events overlap. All-day events never overlap
    /// timed ones; back-to-back events (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (&self.time, &other.time) {
            (
                EventTime::Timed { start: s1, end: e1 },
                EventTime::Timed { start: s2, end: e2 },
            ) => s1 < e2 && e1 > s2,
            _ => false,
        }
    }

    /// Clamp a degenerate interval (`end <= start`) to a minimum positive
    /// duration. Callers run this before lane packing so the packer only
    /// ever sees valid intervals.
    pub fn normalized(mut self) -> Self {
        if let EventTime::Timed { start, end } = self.time {
            if end <= start {
                self.time = EventTime::Timed {
                    start,
                    end: start + Duration::minutes(MIN_EVENT_MINUTES),
                };
            }
        }
        self
    }
}

/// Minimum duration assigned to degenerate timed events, in minutes.
pub const MIN_EVENT_MINUTES: i64 = 30;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    #[test]
    fn managed_by_flag_or_title_tag() {
        let plain = CalendarEvent::timed("1", "Standup", at(9, 0), at(9, 30));
        assert!(!plain.is_managed());

        let tagged = CalendarEvent::timed("2", "[Task] Write report", at(10, 0), at(11, 0));
        assert!(tagged.is_managed());

        let flagged = plain.clone().with_managed(true);
        assert!(flagged.is_managed());
    }

    #[test]
    fn back_to_back_events_do_not_overlap() {
        let a = CalendarEvent::timed("a", "A", at(9, 0), at(10, 0));
        let b = CalendarEvent::timed("b", "B", at(10, 0), at(11, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = CalendarEvent::timed("c", "C", at(9, 30), at(10, 30));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn all_day_never_overlaps_timed() {
        let a = CalendarEvent::all_day("a", "Offsite", at(0, 0).date_naive());
        let b = CalendarEvent::timed("b", "B", at(9, 0), at(17, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn normalized_clamps_degenerate_interval() {
        let ev = CalendarEvent::timed("x", "X", at(10, 0), at(10, 0)).normalized();
        assert_eq!(ev.duration_minutes(), MIN_EVENT_MINUTES);

        let inverted = CalendarEvent::timed("y", "Y", at(10, 0), at(9, 0)).normalized();
        assert_eq!(inverted.start(), Some(at(10, 0)));
        assert_eq!(inverted.duration_minutes(), MIN_EVENT_MINUTES);

        let fine = CalendarEvent::timed("z", "Z", at(9, 0), at(10, 0)).normalized();
        assert_eq!(fine.duration_minutes(), 60);
    }
}
