//! Report generation from a calendar source to a written document.
//!
//! Steps, in order:
//!
//! 1. Ask the source for calendar access (bounded by a timeout)
//! 2. List calendars; none at all ends the run with [`ReportError::NoData`]
//!    before anything is written. Calendars sharing a name are reported as
//!    one calendar
//! 3. Build the calendar color map from every listed calendar
//! 4. Fetch, normalize and aggregate the events of each calendar
//! 5. Assemble the report tables and hand them to the writer
//!
//! A run keeps no state between invocations; the same input always yields the
//! same report.

use crate::libs::color::CalendarColorMap;
use crate::libs::date_range::DateRange;
use crate::libs::error::{ReportError, Result};
use crate::libs::event::NormalizedEvent;
use crate::libs::export::ReportWriter;
use crate::libs::report::{Report, ReportOptions};
use crate::libs::summary::{Aggregator, NegativeDurations, Summary};
use crate::source::{AccessStatus, CalendarSource};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Settings of one report run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub report: ReportOptions,
    pub negative_durations: NegativeDurations,
    pub access_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            report: ReportOptions::default(),
            negative_durations: NegativeDurations::default(),
            access_timeout: Duration::from_secs(10),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub summary: Summary,
    pub report: Report,
    pub calendars: usize,
    pub events: usize,
}

/// Aggregated source data of one window, before report assembly.
#[derive(Debug, Clone)]
pub struct Collected {
    pub summary: Summary,
    pub colors: CalendarColorMap,
    pub calendars: usize,
    pub events: usize,
}

/// Collects the summary of `range` from `source` without writing anything.
pub fn summarize(source: &dyn CalendarSource, range: &DateRange, options: &PipelineOptions) -> Result<Collected> {
    match source.request_access(options.access_timeout) {
        AccessStatus::Granted => {}
        AccessStatus::Denied => return Err(ReportError::AccessDenied),
        AccessStatus::TimedOut => return Err(ReportError::AccessTimedOut(options.access_timeout.as_secs())),
    }

    let mut calendars = source.list_calendars()?;
    if calendars.is_empty() {
        return Err(ReportError::NoData);
    }

    let colors = CalendarColorMap::build(calendars.iter().map(|calendar| (calendar.name.as_str(), &calendar.color)));

    // Sources return the events of every calendar with a given name, so each
    // name is fetched once.
    let mut seen = HashSet::new();
    calendars.retain(|calendar| seen.insert(calendar.name.clone()));

    let mut aggregator = Aggregator::new(options.negative_durations);
    let mut collected = 0;
    for calendar in &calendars {
        let events = source.list_events(calendar, range)?;
        tracing::debug!(calendar = %calendar.name, events = events.len(), "fetched calendar events");
        collected += events.len();
        aggregator.extend(events.iter().map(|event| NormalizedEvent::from_raw(event, &calendar.name)));
    }

    Ok(Collected {
        summary: aggregator.finish(),
        colors,
        calendars: calendars.len(),
        events: collected,
    })
}

/// Runs the whole pipeline and writes the report to `output`.
pub fn generate_report(
    source: &dyn CalendarSource,
    writer: &dyn ReportWriter,
    range: &DateRange,
    options: &PipelineOptions,
    output: &Path,
) -> Result<ReportOutcome> {
    let collected = summarize(source, range, options)?;
    let report = Report::assemble(&collected.summary, &collected.colors, range, &options.report);
    writer.write(&report, output)?;

    Ok(ReportOutcome {
        summary: collected.summary,
        report,
        calendars: collected.calendars,
        events: collected.events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::color::SourceColor;
    use crate::libs::event::RawEvent;
    use crate::source::MemorySource;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingWriter {
        written: RefCell<Vec<Report>>,
    }

    impl ReportWriter for RecordingWriter {
        fn write(&self, report: &Report, _path: &Path) -> Result<()> {
            self.written.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn range() -> DateRange {
        DateRange::resolve(3, at(15, 12, 0)).unwrap()
    }

    fn source() -> MemorySource {
        MemorySource::new()
            .with_calendar(
                "Work",
                SourceColor::rgb(0.0, 0.0, 1.0),
                vec![
                    RawEvent::new(at(14, 9, 0), at(14, 10, 30), Some("Planning")),
                    RawEvent::new(at(14, 11, 0), at(14, 13, 15), Some("Planning")),
                    RawEvent::new(at(13, 9, 0), at(13, 8, 0), Some("Broken")),
                    RawEvent::new(at(15, 9, 0), at(15, 10, 0), Some("Today")),
                ],
            )
            .with_calendar("Empty", SourceColor::Unavailable, vec![])
    }

    #[test]
    fn test_pipeline_aggregates_events_in_window() {
        let writer = RecordingWriter::default();
        let outcome = generate_report(&source(), &writer, &range(), &PipelineOptions::default(), Path::new("unused.xlsx")).unwrap();

        assert_eq!(outcome.calendars, 2);
        assert_eq!(outcome.events, 3);
        assert_eq!(outcome.summary.skipped, 1);
        assert_eq!(outcome.summary.totals.len(), 1);
        assert_eq!(outcome.summary.totals[0].total_duration_hours, 3.75);
        assert_eq!(writer.written.borrow().len(), 1);
    }

    #[test]
    fn test_no_calendars_writes_nothing() {
        let writer = RecordingWriter::default();
        let result = generate_report(&MemorySource::new(), &writer, &range(), &PipelineOptions::default(), Path::new("unused.xlsx"));
        assert!(matches!(result, Err(ReportError::NoData)));
        assert!(writer.written.borrow().is_empty());
    }

    #[test]
    fn test_access_refusal_stops_the_run() {
        let writer = RecordingWriter::default();
        let denied = source().with_access(AccessStatus::Denied);
        let timed_out = source().with_access(AccessStatus::TimedOut);
        let options = PipelineOptions::default();

        assert!(matches!(generate_report(&denied, &writer, &range(), &options, Path::new("x")), Err(ReportError::AccessDenied)));
        assert!(matches!(
            generate_report(&timed_out, &writer, &range(), &options, Path::new("x")),
            Err(ReportError::AccessTimedOut(10))
        ));
        assert!(writer.written.borrow().is_empty());
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let writer = RecordingWriter::default();
        let options = PipelineOptions::default();
        generate_report(&source(), &writer, &range(), &options, Path::new("a.xlsx")).unwrap();
        generate_report(&source(), &writer, &range(), &options, Path::new("a.xlsx")).unwrap();

        let written = writer.written.borrow();
        assert_eq!(written[0], written[1]);
    }

    #[test]
    fn test_calendars_sharing_a_name_are_counted_once() {
        let shared = MemorySource::new()
            .with_calendar("Work", SourceColor::rgb(0.0, 0.0, 1.0), vec![RawEvent::new(at(14, 9, 0), at(14, 10, 0), Some("Standup"))])
            .with_calendar("Work", SourceColor::rgb(1.0, 0.0, 0.0), vec![RawEvent::new(at(14, 11, 0), at(14, 13, 0), Some("Review"))]);
        let collected = summarize(&shared, &range(), &PipelineOptions::default()).unwrap();

        assert_eq!(collected.calendars, 1);
        assert_eq!(collected.events, 2);
        assert_eq!(collected.summary.totals.len(), 1);
        assert_eq!(collected.summary.total_hours(), 3.0);
        assert_eq!(collected.colors.get("Work"), "0000FF");
    }

    #[test]
    fn test_keep_policy_passes_negative_hours_through() {
        let options = PipelineOptions {
            negative_durations: NegativeDurations::Keep,
            ..PipelineOptions::default()
        };
        let summary = summarize(&source(), &range(), &options).unwrap().summary;
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.total_hours(), 2.75);
    }
}
