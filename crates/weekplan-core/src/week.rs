//! Week window and per-day event grouping.
//!
//! A [`WeekWindow`] is a Monday-anchored 7-day span. [`DayBuckets`] sorts a
//! snapshot of events into per-day buckets of timed and all-day events,
//! dropping anything malformed or outside the window -- that filtering is
//! the only place invalid events are handled, so the lane packer never sees
//! them.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventTime};

pub const DAYS_PER_WEEK: usize = 7;

/// A Monday-anchored week of seven days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
}

impl WeekWindow {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self {
            start: date - Duration::days(offset),
        }
    }

    /// The current week.
    pub fn this_week() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn prev(self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    /// Last day of the window (inclusive).
    pub fn end(self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    /// UTC instant range covering the window: `[start, start + 7d)`.
    pub fn range_utc(self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
        (start, start + Duration::days(7))
    }

    /// Day index (0..7) of a date within this window, if inside it.
    pub fn day_index(self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start).num_days();
        if (0..DAYS_PER_WEEK as i64).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Dates of the seven days, Monday first.
    pub fn days(self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }
}

/// Per-day buckets of one week's events.
#[derive(Debug, Clone, Default)]
pub struct DayBuckets {
    /// Timed events per day, in snapshot order.
    pub timed: [Vec<CalendarEvent>; DAYS_PER_WEEK],
    /// All-day events per day, in snapshot order.
    pub all_day: [Vec<CalendarEvent>; DAYS_PER_WEEK],
}

impl DayBuckets {
    /// Group a snapshot into per-day buckets.
    ///
    /// Timed events are bucketed by their start date and normalized to a
    /// minimum positive duration; all-day events by their date. Events
    /// outside the window are dropped. Snapshot order is preserved within
    /// each bucket so repeated grouping of the same input is reproducible.
    pub fn group(week: WeekWindow, events: &[CalendarEvent]) -> Self {
        let mut buckets = Self::default();
        for ev in events {
            match ev.time {
                EventTime::Timed { start, .. } => {
                    if let Some(idx) = week.day_index(start.date_naive()) {
                        buckets.timed[idx].push(ev.clone().normalized());
                    }
                }
                EventTime::AllDay { date } => {
                    if let Some(idx) = week.day_index(date) {
                        buckets.all_day[idx].push(ev.clone());
                    }
                }
            }
        }
        buckets
    }

    /// Total number of bucketed events.
    pub fn len(&self) -> usize {
        self.timed.iter().map(Vec::len).sum::<usize>()
            + self.all_day.iter().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 2026-03-02 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, 0, 0).unwrap()
    }

    #[test]
    fn containing_anchors_to_monday() {
        for offset in 0..7 {
            let date = monday() + Duration::days(offset);
            assert_eq!(WeekWindow::containing(date).start, monday());
        }
        let next_monday = monday() + Duration::days(7);
        assert_eq!(WeekWindow::containing(next_monday).start, next_monday);
    }

    #[test]
    fn prev_next_navigation() {
        let week = WeekWindow { start: monday() };
        assert_eq!(week.next().prev(), week);
        assert_eq!(week.next().start, monday() + Duration::days(7));
    }

    #[test]
    fn range_covers_seven_days() {
        let week = WeekWindow { start: monday() };
        let (lo, hi) = week.range_utc();
        assert_eq!((hi - lo).num_days(), 7);
        assert_eq!(lo.date_naive(), monday());
    }

    #[test]
    fn day_index_bounds() {
        let week = WeekWindow { start: monday() };
        assert_eq!(week.day_index(monday()), Some(0));
        assert_eq!(week.day_index(week.end()), Some(6));
        assert_eq!(week.day_index(monday() - Duration::days(1)), None);
        assert_eq!(week.day_index(monday() + Duration::days(7)), None);
    }

    #[test]
    fn group_buckets_by_day_and_kind() {
        let week = WeekWindow { start: monday() };
        let events = vec![
            CalendarEvent::timed("mon", "Mon", at(2, 9), at(2, 10)),
            CalendarEvent::timed("wed", "Wed", at(4, 9), at(4, 10)),
            CalendarEvent::all_day("off", "Offsite", monday()),
            // Outside the window: dropped.
            CalendarEvent::timed("next", "Next week", at(9, 9), at(9, 10)),
        ];

        let buckets = DayBuckets::group(week, &events);
        assert_eq!(buckets.timed[0].len(), 1);
        assert_eq!(buckets.timed[2].len(), 1);
        assert_eq!(buckets.all_day[0].len(), 1);
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn group_normalizes_degenerate_events() {
        let week = WeekWindow { start: monday() };
        let events = vec![CalendarEvent::timed("z", "Zero", at(2, 9), at(2, 9))];
        let buckets = DayBuckets::group(week, &events);
        assert!(buckets.timed[0][0].duration_minutes() > 0);
    }
}
