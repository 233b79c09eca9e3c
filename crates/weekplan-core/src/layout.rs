//! Lane packing for overlapping events.
//!
//! Packs one day's timed events into the minimum number of non-overlapping
//! display columns ("lanes") using greedy earliest-fit interval coloring.
//! The lane count equals the day's overlap depth -- the maximum number of
//! events simultaneously active at any instant -- which is a lower bound
//! for any valid coloring, so the greedy result is optimal.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventTime};

/// Lane position of one event within its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSlot {
    /// Zero-based lane index.
    pub lane: usize,
    /// Total lanes opened for the day; every event of the day shares it.
    pub lane_count: usize,
}

/// Lane assignment for one day, keyed by event id.
///
/// Derived data: recomputed on every refresh, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    slots: HashMap<String, LaneSlot>,
    lanes: usize,
}

impl LaneLayout {
    pub fn slot(&self, event_id: &str) -> Option<LaneSlot> {
        self.slots.get(event_id).copied()
    }

    /// Number of lanes opened for the day.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LaneSlot)> {
        self.slots.iter().map(|(id, slot)| (id.as_str(), *slot))
    }
}

/// Pack one day's timed events into lanes.
///
/// Events are sorted by start instant; ties keep the caller's order so
/// repeated packing of the same snapshot is reproducible. Each event goes
/// to the first lane whose recorded end time is `<=` its start (an event
/// ending at 10:00 does not block a lane needed at 10:00); otherwise a new
/// lane opens. All-day entries are skipped -- callers bucket those
/// separately.
pub fn pack(events: &[CalendarEvent]) -> LaneLayout {
    let mut items: Vec<(&CalendarEvent, DateTime<Utc>, DateTime<Utc>)> = events
        .iter()
        .filter_map(|ev| match ev.time {
            EventTime::Timed { start, end } => Some((ev, start, end)),
            EventTime::AllDay { .. } => None,
        })
        .collect();
    items.sort_by_key(|&(_, start, _)| start);

    // One recorded end time per open lane, scanned in index order.
    let mut lane_ends: Vec<DateTime<Utc>> = Vec::new();
    let mut slots = HashMap::with_capacity(items.len());

    for (ev, start, end) in items {
        let lane = match lane_ends.iter().position(|&lane_end| lane_end <= start) {
            Some(i) => {
                lane_ends[i] = end;
                i
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };
        slots.insert(ev.id.clone(), LaneSlot { lane, lane_count: 0 });
    }

    let lanes = lane_ends.len();
    for slot in slots.values_mut() {
        slot.lane_count = lanes;
    }

    LaneLayout { slots, lanes }
}

/// Maximum number of events simultaneously active at any instant.
///
/// Sweep-line over start/end boundaries; an end at instant `t` is processed
/// before a start at `t`, matching the packer's non-overlap rule for
/// back-to-back events.
pub fn overlap_depth(events: &[CalendarEvent]) -> usize {
    let mut boundaries: Vec<(DateTime<Utc>, i32)> = Vec::new();
    for ev in events {
        if let EventTime::Timed { start, end } = ev.time {
            boundaries.push((start, 1));
            boundaries.push((end, -1));
        }
    }
    // Ends (-1) sort before starts (+1) at equal instants.
    boundaries.sort_by_key(|&(t, delta)| (t, delta));

    let mut depth: i32 = 0;
    let mut max_depth: i32 = 0;
    for (_, delta) in boundaries {
        depth += delta;
        max_depth = max_depth.max(depth);
    }
    max_depth as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    fn ev(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent::timed(id, id.to_uppercase(), start, end)
    }

    #[test]
    fn abc_scenario() {
        // A(09:00-10:00), B(09:30-10:30), C(10:00-11:00):
        // A,B overlap; B,C overlap; A,C do not.
        let events = vec![
            ev("a", at(9, 0), at(10, 0)),
            ev("b", at(9, 30), at(10, 30)),
            ev("c", at(10, 0), at(11, 0)),
        ];
        let layout = pack(&events);

        assert_eq!(layout.slot("a").unwrap().lane, 0);
        assert_eq!(layout.slot("b").unwrap().lane, 1);
        assert_eq!(layout.slot("c").unwrap().lane, 0);
        assert_eq!(layout.lanes(), 2);
        for (_, slot) in layout.iter() {
            assert_eq!(slot.lane_count, 2);
        }
        assert_eq!(overlap_depth(&events), 2);
    }

    #[test]
    fn empty_input() {
        let layout = pack(&[]);
        assert!(layout.is_empty());
        assert_eq!(layout.lanes(), 0);
        assert_eq!(overlap_depth(&[]), 0);
    }

    #[test]
    fn disjoint_events_share_one_lane() {
        let events = vec![
            ev("a", at(9, 0), at(10, 0)),
            ev("b", at(10, 0), at(11, 0)),
            ev("c", at(11, 0), at(12, 0)),
        ];
        let layout = pack(&events);
        assert_eq!(layout.lanes(), 1);
        for (_, slot) in layout.iter() {
            assert_eq!(slot.lane, 0);
        }
    }

    #[test]
    fn fully_nested_events_each_open_a_lane() {
        let events = vec![
            ev("outer", at(9, 0), at(12, 0)),
            ev("mid", at(9, 30), at(11, 0)),
            ev("inner", at(10, 0), at(10, 30)),
        ];
        let layout = pack(&events);
        assert_eq!(layout.lanes(), 3);
        assert_eq!(layout.lanes(), overlap_depth(&events));
    }

    #[test]
    fn ties_keep_caller_order() {
        // Same start instant: the snapshot order decides lane assignment.
        let events = vec![
            ev("first", at(9, 0), at(10, 0)),
            ev("second", at(9, 0), at(9, 30)),
        ];
        let layout = pack(&events);
        assert_eq!(layout.slot("first").unwrap().lane, 0);
        assert_eq!(layout.slot("second").unwrap().lane, 1);
    }

    #[test]
    fn lane_freed_after_event_ends_is_reused() {
        let events = vec![
            ev("a", at(9, 0), at(10, 0)),
            ev("b", at(9, 0), at(11, 0)),
            ev("c", at(10, 0), at(10, 30)),
        ];
        let layout = pack(&events);
        // C reuses A's lane, the first whose end <= 10:00.
        assert_eq!(layout.slot("c").unwrap().lane, 0);
        assert_eq!(layout.lanes(), 2);
    }

    #[test]
    fn all_day_entries_are_skipped() {
        let events = vec![
            CalendarEvent::all_day("off", "Offsite", at(0, 0).date_naive()),
            ev("a", at(9, 0), at(10, 0)),
        ];
        let layout = pack(&events);
        assert_eq!(layout.len(), 1);
        assert!(layout.slot("off").is_none());
    }

    // Strategy: up to 24 events within one day, minute-resolution starts,
    // durations from zero (degenerate, pre-normalization) to 8 hours.
    fn day_events() -> impl Strategy<Value = Vec<CalendarEvent>> {
        prop::collection::vec((0u32..1380, 0u32..480), 0..24).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (start_min, dur_min))| {
                    let start = at(0, 0) + chrono::Duration::minutes(start_min as i64);
                    let end = start + chrono::Duration::minutes(dur_min.max(1) as i64);
                    ev(&format!("e{i}"), start, end)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn lanes_equal_overlap_depth(events in day_events()) {
            let layout = pack(&events);
            prop_assert_eq!(layout.lanes(), overlap_depth(&events));
        }

        #[test]
        fn same_lane_events_never_overlap(events in day_events()) {
            let layout = pack(&events);
            for a in &events {
                for b in &events {
                    if a.id == b.id {
                        continue;
                    }
                    let (sa, sb) = (layout.slot(&a.id).unwrap(), layout.slot(&b.id).unwrap());
                    if sa.lane == sb.lane {
                        prop_assert!(!a.overlaps(b), "{} and {} share a lane and overlap", a.id, b.id);
                    }
                }
            }
        }

        #[test]
        fn packing_is_idempotent(events in day_events()) {
            prop_assert_eq!(pack(&events), pack(&events));
        }
    }
}
