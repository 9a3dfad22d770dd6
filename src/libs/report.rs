//! Report assembly.
//!
//! Turns the aggregator's [`Summary`] into the logical tables of the report
//! document. Each table has its own builder so it can be produced and checked
//! on its own; [`Report::assemble`] simply calls all of them.
//!
//! ## Tables
//!
//! - **Main table** (`Data` sheet): one row per daily summary record, tagged
//!   with the calendar color for row fills
//! - **Detail tables**: one per calendar, event name totals plus hours per day
//! - **By day matrix** (`By day` sheet): dates by calendars, source of the
//!   stacked column chart
//! - **Totals table** (`Totals` sheet): grand total per calendar, source of the
//!   pie chart
//!
//! All hour values are rounded here, at the point of output. The summary
//! itself keeps full precision.

use crate::libs::color::CalendarColorMap;
use crate::libs::date_range::DateRange;
use crate::libs::summary::{round_hours, Summary, DEFAULT_DECIMAL_PLACES};
use std::collections::{BTreeMap, HashSet};

/// Title of the sheet holding the main table.
pub const DATA_SHEET: &str = "Data";
/// Title of the sheet holding the by-day matrix and its chart.
pub const BY_DAY_SHEET: &str = "By day";
/// Title of the sheet holding the totals table and its chart.
pub const TOTALS_SHEET: &str = "Totals";

/// Longest sheet title a spreadsheet accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Output settings of report assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Places every hour value is rounded to; see [`round_hours`].
    pub decimal_places: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

/// One row of the `Data` sheet: hours of one calendar on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct MainRow {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub calendar_name: String,
    pub total_hours: f64,
    /// `RRGGBB` fill of the row.
    pub color: String,
}

/// Hours spent on one event name, over the window and per day.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub event_name: String,
    pub total_hours: f64,
    pub hours_per_day: f64,
}

/// Event breakdown of one calendar, written to a sheet of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailTable {
    pub calendar_name: String,
    /// Unique, length-limited sheet title derived from the calendar name.
    pub sheet_name: String,
    pub color: String,
    pub rows: Vec<DetailRow>,
}

/// One date of the by-day matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ByDayRow {
    pub date: String,
    /// One value per entry of [`ByDayTable::calendars`], in the same order.
    pub hours: Vec<f64>,
}

/// Dates by calendars, feeding the stacked column chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ByDayTable {
    /// Column headers, sorted by name.
    pub calendars: Vec<String>,
    /// Series colors, parallel to `calendars`.
    pub colors: Vec<String>,
    pub rows: Vec<ByDayRow>,
}

/// Grand total of one calendar; also a slice of the pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsRow {
    pub calendar_name: String,
    pub total_hours: f64,
    pub color: String,
}

/// Everything the document writer needs, already ordered and rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub period_start: String,
    pub period_end: String,
    pub days_in_period: i64,
    pub main: Vec<MainRow>,
    pub by_day: ByDayTable,
    pub totals: Vec<TotalsRow>,
    pub details: Vec<DetailTable>,
}

impl Report {
    /// Builds every table of the report from `summary`.
    ///
    /// Calendars missing from `colors` get the fallback color.
    pub fn assemble(summary: &Summary, colors: &CalendarColorMap, range: &DateRange, options: &ReportOptions) -> Self {
        let days_in_period = range.days_in_period();
        Self {
            period_start: range.start.format(DATE_FORMAT).to_string(),
            period_end: range.end.format(DATE_FORMAT).to_string(),
            days_in_period,
            main: main_table(summary, colors, options.decimal_places),
            by_day: by_day_table(summary, colors, options.decimal_places),
            totals: totals_table(summary, colors, options.decimal_places),
            details: detail_tables(summary, colors, days_in_period, options.decimal_places),
        }
    }

    /// `true` when the window held no events.
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

/// Builds the main table, one row per daily summary record in date order.
pub fn main_table(summary: &Summary, colors: &CalendarColorMap, decimal_places: u32) -> Vec<MainRow> {
    summary
        .daily
        .iter()
        .map(|record| MainRow {
            date: record.event_date.format(DATE_FORMAT).to_string(),
            calendar_name: record.calendar_name.clone(),
            total_hours: round_hours(record.total_duration_hours, decimal_places),
            color: colors.get(&record.calendar_name).to_string(),
        })
        .collect()
}

/// Builds one detail table per calendar of the event summary.
///
/// `days_in_period` is floored at 1 so hours per day is always defined.
pub fn detail_tables(summary: &Summary, colors: &CalendarColorMap, days_in_period: i64, decimal_places: u32) -> Vec<DetailTable> {
    let days = days_in_period.max(1) as f64;
    let mut grouped: BTreeMap<&str, Vec<DetailRow>> = BTreeMap::new();
    for record in &summary.events {
        grouped.entry(record.calendar_name.as_str()).or_default().push(DetailRow {
            event_name: record.event_name.clone(),
            total_hours: round_hours(record.total_duration_hours, decimal_places),
            hours_per_day: round_hours(record.total_duration_hours / days, decimal_places),
        });
    }

    let mut names = SheetNames::new();
    grouped
        .into_iter()
        .map(|(calendar_name, rows)| DetailTable {
            calendar_name: calendar_name.to_string(),
            sheet_name: names.claim(calendar_name),
            color: colors.get(calendar_name).to_string(),
            rows,
        })
        .collect()
}

/// Builds the date by calendar matrix.
///
/// Calendars are ordered by name; the header and every row use that order.
/// Missing (date, calendar) pairs are 0.
pub fn by_day_table(summary: &Summary, colors: &CalendarColorMap, decimal_places: u32) -> ByDayTable {
    let calendars: Vec<String> = summary.calendars().into_iter().map(str::to_string).collect();
    let column: BTreeMap<&str, usize> = calendars.iter().enumerate().map(|(i, name)| (name.as_str(), i)).collect();

    let mut rows: Vec<ByDayRow> = Vec::new();
    for record in &summary.daily {
        let date = record.event_date.format(DATE_FORMAT).to_string();
        if rows.last().map(|row| row.date != date).unwrap_or(true) {
            rows.push(ByDayRow {
                date,
                hours: vec![0.0; calendars.len()],
            });
        }
        if let (Some(row), Some(&index)) = (rows.last_mut(), column.get(record.calendar_name.as_str())) {
            row.hours[index] += record.total_duration_hours;
        }
    }
    for row in &mut rows {
        for value in &mut row.hours {
            *value = round_hours(*value, decimal_places);
        }
    }

    ByDayTable {
        colors: calendars.iter().map(|name| colors.get(name).to_string()).collect(),
        calendars,
        rows,
    }
}

/// Builds the totals table, one row per calendar sorted by name.
pub fn totals_table(summary: &Summary, colors: &CalendarColorMap, decimal_places: u32) -> Vec<TotalsRow> {
    summary
        .totals
        .iter()
        .map(|total| TotalsRow {
            calendar_name: total.calendar_name.clone(),
            total_hours: round_hours(total.total_duration_hours, decimal_places),
            color: colors.get(&total.calendar_name).to_string(),
        })
        .collect()
}

/// Hands out unique sheet titles.
///
/// Titles are cleaned of characters spreadsheets reject, cut to
/// [`MAX_SHEET_NAME_LEN`] characters and, when they clash with an earlier
/// title or a fixed sheet (case-insensitively), suffixed with ` (2)`, ` (3)`...
#[derive(Debug)]
pub struct SheetNames {
    taken: HashSet<String>,
}

impl SheetNames {
    pub fn new() -> Self {
        let taken = [DATA_SHEET, BY_DAY_SHEET, TOTALS_SHEET].iter().map(|name| name.to_lowercase()).collect();
        Self { taken }
    }

    /// Returns a title for `calendar_name` that no earlier claim returned.
    pub fn claim(&mut self, calendar_name: &str) -> String {
        let base = sanitize_sheet_name(calendar_name);
        let mut candidate = truncate_chars(&base, MAX_SHEET_NAME_LEN);
        let mut counter = 2;
        while self.taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", counter);
            candidate = format!("{}{}", truncate_chars(&base, MAX_SHEET_NAME_LEN - suffix.chars().count()), suffix);
            counter += 1;
        }
        self.taken.insert(candidate.to_lowercase());
        candidate
    }
}

impl Default for SheetNames {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    // Titles may not start or end with an apostrophe.
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Calendar".to_string()
    } else {
        cleaned
    }
}

/// Cuts `value` to `max` characters. The cut may expose an apostrophe or a
/// space, so both are trimmed from the end again.
fn truncate_chars(value: &str, max: usize) -> String {
    value
        .chars()
        .take(max)
        .collect::<String>()
        .trim_end_matches(|c: char| c == '\'' || c.is_whitespace())
        .to_string()
}
