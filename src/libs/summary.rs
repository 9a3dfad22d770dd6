//! Aggregation of normalized events into summary tables.
//!
//! Three tables are derived from one pass over the events:
//!
//! - **Daily summary**: total hours per (date, calendar)
//! - **Event summary**: total hours per (calendar, event name) over the window
//! - **Calendar totals**: total hours per calendar, derived from the daily summary
//!
//! Accumulation happens in `BTreeMap`s keyed by the composite key, so the order
//! in which events arrive never changes the output. Values stay unrounded until
//! they are written out; see [`round_hours`].
//!
//! ```rust
//! use calsum::libs::event::{NormalizedEvent, RawEvent};
//! use calsum::libs::summary::Aggregator;
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let raw = RawEvent::new(day.and_hms_opt(9, 0, 0).unwrap(), day.and_hms_opt(10, 30, 0).unwrap(), Some("Standup"));
//!
//! let mut aggregator = Aggregator::default();
//! aggregator.add(NormalizedEvent::from_raw(&raw, "Work"));
//! let summary = aggregator.finish();
//! assert_eq!(summary.totals[0].total_duration_hours, 1.5);
//! ```

use crate::libs::event::NormalizedEvent;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decimal places used for hour values in reports.
pub const DEFAULT_DECIMAL_PLACES: u32 = 3;

/// Most decimal places a report may ask for. Larger values are clamped.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// What to do with events whose end lies before their start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NegativeDurations {
    /// Drop the event from every table.
    #[default]
    Skip,
    /// Count the event with zero hours.
    Clamp,
    /// Keep the negative duration as is.
    Keep,
}

/// Hours of one calendar on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummaryRecord {
    pub event_date: NaiveDate,
    pub calendar_name: String,
    pub total_duration_hours: f64,
}

/// Hours of one event name within one calendar, over the whole window.
///
/// Events are grouped by their exact title, so titles differing only in
/// spacing are separate records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEventSummaryRecord {
    pub calendar_name: String,
    pub event_name: String,
    pub total_duration_hours: f64,
}

/// Hours of one calendar over the whole window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarTotalRecord {
    pub calendar_name: String,
    pub total_duration_hours: f64,
}

/// Output of an [`Aggregator`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Sorted by date, then calendar name.
    pub daily: Vec<DailySummaryRecord>,
    /// Sorted by calendar name, then event name.
    pub events: Vec<CalendarEventSummaryRecord>,
    /// Sorted by calendar name.
    pub totals: Vec<CalendarTotalRecord>,
    /// Events dropped because of a negative duration.
    pub skipped: usize,
}

impl Summary {
    /// Event summary rows of a single calendar.
    pub fn events_for<'a>(&'a self, calendar_name: &'a str) -> impl Iterator<Item = &'a CalendarEventSummaryRecord> + 'a {
        self.events.iter().filter(move |record| record.calendar_name == calendar_name)
    }

    /// Distinct calendar names of the daily summary, sorted.
    pub fn calendars(&self) -> Vec<&str> {
        self.totals.iter().map(|total| total.calendar_name.as_str()).collect()
    }

    /// Distinct dates of the daily summary, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.daily.iter().map(|record| record.event_date).collect();
        dates.dedup();
        dates
    }

    /// Sum of every calendar total.
    pub fn total_hours(&self) -> f64 {
        self.totals.iter().map(|total| total.total_duration_hours).sum()
    }
}

/// Folds normalized events into summary tables.
///
/// The aggregator is a single writer: when events are fetched concurrently,
/// collect them per calendar and feed them in from one place.
#[derive(Debug, Default)]
pub struct Aggregator {
    policy: NegativeDurations,
    daily: BTreeMap<(NaiveDate, String), f64>,
    events: BTreeMap<(String, String), f64>,
    skipped: usize,
}

impl Aggregator {
    /// Creates an empty aggregator applying `policy` to negative durations.
    pub fn new(policy: NegativeDurations) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Adds one event to the daily and event summaries.
    ///
    /// Returns `false` when the event was dropped by the negative duration policy.
    pub fn add(&mut self, event: NormalizedEvent) -> bool {
        let mut hours = event.duration_hours;
        if hours < 0.0 {
            match self.policy {
                NegativeDurations::Skip => {
                    tracing::warn!(
                        calendar = %event.calendar_name,
                        event = %event.event_name,
                        date = %event.event_date,
                        hours,
                        "skipping event that ends before it starts"
                    );
                    self.skipped += 1;
                    return false;
                }
                NegativeDurations::Clamp => hours = 0.0,
                NegativeDurations::Keep => {}
            }
        }

        *self.daily.entry((event.event_date, event.calendar_name.clone())).or_insert(0.0) += hours;
        *self.events.entry((event.calendar_name, event.event_name)).or_insert(0.0) += hours;
        true
    }

    /// Adds every event of `events`; see [`Aggregator::add`].
    pub fn extend<I: IntoIterator<Item = NormalizedEvent>>(&mut self, events: I) {
        for event in events {
            self.add(event);
        }
    }

    /// Produces the sorted summary tables.
    ///
    /// Calendar totals are computed here from the finished daily summary,
    /// not while events are added.
    pub fn finish(self) -> Summary {
        let daily: Vec<DailySummaryRecord> = self
            .daily
            .into_iter()
            .map(|((event_date, calendar_name), total_duration_hours)| DailySummaryRecord {
                event_date,
                calendar_name,
                total_duration_hours,
            })
            .collect();

        let events = self
            .events
            .into_iter()
            .map(|((calendar_name, event_name), total_duration_hours)| CalendarEventSummaryRecord {
                calendar_name,
                event_name,
                total_duration_hours,
            })
            .collect();

        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in &daily {
            *totals.entry(record.calendar_name.as_str()).or_insert(0.0) += record.total_duration_hours;
        }
        let totals = totals
            .into_iter()
            .map(|(calendar_name, total_duration_hours)| CalendarTotalRecord {
                calendar_name: calendar_name.to_string(),
                total_duration_hours,
            })
            .collect();

        Summary {
            daily,
            events,
            totals,
            skipped: self.skipped,
        }
    }
}

/// Rounds an hour value to `decimal_places` for output.
///
/// `decimal_places` above [`MAX_DECIMAL_PLACES`] is treated as the maximum.
pub fn round_hours(hours: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places.min(MAX_DECIMAL_PLACES) as i32);
    let rounded = (hours * factor).round() / factor;
    // Avoid printing "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(day: u32, calendar: &str, name: &str, hours: f64) -> NormalizedEvent {
        NormalizedEvent {
            event_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            calendar_name: calendar.to_string(),
            event_name: name.to_string(),
            duration_hours: hours,
        }
    }

    fn sample() -> Vec<NormalizedEvent> {
        vec![
            event(14, "Work", "Standup", 0.25),
            event(12, "Home", "Gym", 1.0),
            event(12, "Work", "Review", 2.0),
            event(14, "Work", "Standup", 0.25),
            event(13, "Home", "Cooking", 0.75),
            event(12, "Work", "Standup", 0.25),
        ]
    }

    #[test]
    fn test_same_day_same_calendar_accumulates() {
        let mut aggregator = Aggregator::default();
        aggregator.add(event(15, "Work", "A", 1.5));
        aggregator.add(event(15, "Work", "B", 2.25));
        let summary = aggregator.finish();

        assert_eq!(summary.daily.len(), 1);
        assert_eq!(summary.daily[0].total_duration_hours, 3.75);
        assert_eq!(format!("{:.3}", round_hours(summary.daily[0].total_duration_hours, 3)), "3.750");
    }

    #[test]
    fn test_rounding_clamps_decimal_places() {
        assert_eq!(round_hours(1.0 / 3.0, 2), 0.33);
        assert_eq!(round_hours(1.0 / 3.0, u32::MAX), round_hours(1.0 / 3.0, MAX_DECIMAL_PLACES));
        assert!(round_hours(2.5, 4_000_000_000).is_finite());
        assert_eq!(round_hours(-0.0001, 2), 0.0);
    }

    #[test]
    fn test_total_duration_is_conserved() {
        let events = sample();
        let input_total: f64 = events.iter().map(|e| e.duration_hours).sum();

        let mut aggregator = Aggregator::default();
        aggregator.extend(events);
        let summary = aggregator.finish();

        let daily_total: f64 = summary.daily.iter().map(|r| r.total_duration_hours).sum();
        assert!((daily_total - input_total).abs() < 1e-9);
        assert!((summary.total_hours() - input_total).abs() < 1e-9);
    }

    #[test]
    fn test_totals_match_daily_records() {
        let mut aggregator = Aggregator::default();
        aggregator.extend(sample());
        let summary = aggregator.finish();

        for total in &summary.totals {
            let from_daily: f64 = summary
                .daily
                .iter()
                .filter(|r| r.calendar_name == total.calendar_name)
                .map(|r| r.total_duration_hours)
                .sum();
            assert!((total.total_duration_hours - from_daily).abs() < 1e-9);
        }
        assert_eq!(summary.calendars(), vec!["Home", "Work"]);
    }

    #[test]
    fn test_daily_records_sorted_by_date() {
        let mut aggregator = Aggregator::default();
        aggregator.extend(sample());
        let summary = aggregator.finish();

        assert!(summary.daily.windows(2).all(|w| w[0].event_date <= w[1].event_date));
        assert_eq!(summary.dates().len(), 3);
    }

    #[test]
    fn test_event_summary_groups_by_calendar_and_name() {
        let mut aggregator = Aggregator::default();
        aggregator.extend(sample());
        let summary = aggregator.finish();

        let work: Vec<_> = summary.events_for("Work").collect();
        assert_eq!(work.len(), 2);
        assert_eq!(work[0].event_name, "Review");
        assert_eq!(work[1].event_name, "Standup");
        assert_eq!(work[1].total_duration_hours, 0.75);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut forward = Aggregator::default();
        forward.extend(sample());
        let mut backward = Aggregator::default();
        backward.extend(sample().into_iter().rev());
        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_negative_duration_policies() {
        let broken = || event(15, "Work", "Broken", -1.0);

        let mut skip = Aggregator::new(NegativeDurations::Skip);
        assert!(!skip.add(broken()));
        let summary = skip.finish();
        assert!(summary.daily.is_empty());
        assert_eq!(summary.skipped, 1);

        let mut clamp = Aggregator::new(NegativeDurations::Clamp);
        assert!(clamp.add(broken()));
        assert_eq!(clamp.finish().daily[0].total_duration_hours, 0.0);

        let mut keep = Aggregator::new(NegativeDurations::Keep);
        assert!(keep.add(broken()));
        assert_eq!(keep.finish().daily[0].total_duration_hours, -1.0);
    }

    #[test]
    fn test_zero_duration_events_are_kept() {
        let mut aggregator = Aggregator::default();
        assert!(aggregator.add(event(15, "Work", "Reminder", 0.0)));
        assert_eq!(aggregator.finish().events.len(), 1);
    }

    #[test]
    fn test_round_hours() {
        assert_eq!(round_hours(1.23456, 3), 1.235);
        assert_eq!(round_hours(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_hours(-0.0001, 3), 0.0);
    }
}
