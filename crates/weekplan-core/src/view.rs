//! Week view refresh orchestration.
//!
//! A refresh pulls the week's events from the provider, groups them into
//! per-day buckets, packs each day's timed events into lanes, and then
//! decides whether the new snapshot should trigger a replan. The refresh
//! run by a replan completion passes `skip_replan = true`, which is the
//! only thing standing between the coordinator and an infinite
//! replan -> refresh -> replan loop.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::event::CalendarEvent;
use crate::layout::{self, LaneLayout};
use crate::optimizer::CapacityWarning;
use crate::provider::{CalendarProvider, TimeRange};
use crate::replan::{ReplanCoordinator, ReplanOutcome, ReplanTrigger};
use crate::week::{DayBuckets, WeekWindow, DAYS_PER_WEEK};

/// One rendered day: its events plus their lane assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub timed: Vec<CalendarEvent>,
    pub all_day: Vec<CalendarEvent>,
    pub lanes: LaneLayout,
}

/// Fully laid-out week, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekLayout {
    pub week: WeekWindow,
    pub days: [DayPlan; DAYS_PER_WEEK],
}

impl WeekLayout {
    /// Group and lane-pack a snapshot of events.
    pub fn build(week: WeekWindow, events: &[CalendarEvent]) -> Self {
        let buckets = DayBuckets::group(week, events);
        let dates = week.days();
        let days = std::array::from_fn(|i| {
            let timed = buckets.timed[i].clone();
            let lanes = layout::pack(&timed);
            DayPlan {
                date: dates[i],
                timed,
                all_day: buckets.all_day[i].clone(),
                lanes,
            }
        });
        Self { week, days }
    }

    /// Total events across the week.
    pub fn len(&self) -> usize {
        self.days
            .iter()
            .map(|d| d.timed.len() + d.all_day.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a refresh did: the new layout, plus the replan decision if one was
/// requested.
#[derive(Debug)]
pub struct RefreshSummary {
    pub layout: WeekLayout,
    /// `None` when no replan was requested (skip flag set, or replan on
    /// change disabled).
    pub replan: Option<ReplanOutcome>,
}

/// The week view: current window, data source, and replan wiring.
pub struct WeekView {
    provider: Arc<dyn CalendarProvider>,
    coordinator: Arc<ReplanCoordinator>,
    week: WeekWindow,
    replan_on_event_change: bool,
}

impl WeekView {
    pub fn new(provider: Arc<dyn CalendarProvider>, coordinator: Arc<ReplanCoordinator>) -> Self {
        Self {
            provider,
            coordinator,
            week: WeekWindow::this_week(),
            replan_on_event_change: true,
        }
    }

    /// View configured from `[replan]` (`replan_on_event_change`).
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn CalendarProvider>,
        coordinator: Arc<ReplanCoordinator>,
    ) -> Self {
        Self::new(provider, coordinator)
            .with_replan_on_event_change(config.replan.replan_on_event_change)
    }

    /// Disable event-driven replan requests; periodic and manual triggers
    /// still go through the coordinator.
    pub fn with_replan_on_event_change(mut self, enabled: bool) -> Self {
        self.replan_on_event_change = enabled;
        self
    }

    pub fn with_week(mut self, week: WeekWindow) -> Self {
        self.week = week;
        self
    }

    pub fn week(&self) -> WeekWindow {
        self.week
    }

    pub fn go_prev_week(&mut self) {
        self.week = self.week.prev();
    }

    pub fn go_next_week(&mut self) {
        self.week = self.week.next();
    }

    pub fn go_this_week(&mut self) {
        self.week = WeekWindow::this_week();
    }

    /// Refresh the view from the provider.
    ///
    /// `warnings` is the latest capacity analysis snapshot; a critical
    /// warning upgrades the trigger severity. `tracked_tasks` is the count
    /// of scheduler tasks not yet placed on the calendar. When
    /// `skip_replan` is set (completion-driven refreshes) no trigger is
    /// built at all.
    pub fn refresh(
        &self,
        warnings: &[CapacityWarning],
        tracked_tasks: usize,
        skip_replan: bool,
    ) -> Result<RefreshSummary> {
        let events = self.provider.list_events(TimeRange::from(self.week))?;
        let layout = WeekLayout::build(self.week, &events);
        tracing::debug!(
            week_start = %self.week.start,
            events = events.len(),
            "week view refreshed"
        );

        if skip_replan || !self.replan_on_event_change {
            return Ok(RefreshSummary {
                layout,
                replan: None,
            });
        }

        let trigger = match warnings.iter().find(|w| w.is_critical()) {
            Some(w) => ReplanTrigger::capacity_critical(w.message.clone()),
            None => ReplanTrigger::event_mutated("Schedule change detected"),
        };
        let outcome = self.coordinator.request_replan(trigger, &events, tracked_tasks);

        Ok(RefreshSummary {
            layout,
            replan: Some(outcome),
        })
    }
}
