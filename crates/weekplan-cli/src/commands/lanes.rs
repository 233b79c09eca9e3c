use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use weekplan_core::event::EventTime;
use weekplan_core::{CalendarEvent, WeekLayout, WeekWindow};

#[derive(Subcommand)]
pub enum LanesAction {
    /// Lay out a week of events from a JSON snapshot
    Show {
        /// JSON file with an array of calendar events
        file: PathBuf,
        /// Any date inside the target week (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Emit the layout as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LanesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LanesAction::Show { file, date, json } => {
            let raw = std::fs::read_to_string(&file)?;
            let events: Vec<CalendarEvent> = serde_json::from_str(&raw)?;

            let week = match date {
                Some(d) => WeekWindow::containing(d),
                None => WeekWindow::this_week(),
            };
            let layout = WeekLayout::build(week, &events);

            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                print_table(&layout);
            }
        }
    }
    Ok(())
}

fn print_table(layout: &WeekLayout) {
    for day in &layout.days {
        if day.timed.is_empty() && day.all_day.is_empty() {
            continue;
        }
        let date = day.date.format("%a %Y-%m-%d");
        let lanes = day.lanes.lanes();
        println!("{date} ({lanes} lane{})", if lanes == 1 { "" } else { "s" });

        for ev in &day.all_day {
            println!("  all-day       {}", ev.title);
        }
        for ev in &day.timed {
            let lane = day.lanes.slot(&ev.id).map(|s| s.lane).unwrap_or(0);
            if let EventTime::Timed { start, end } = ev.time {
                println!(
                    "  [{lane}] {}-{}  {}",
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    ev.title
                );
            }
        }
    }
}
