//! Calendar sources feeding the report pipeline.
//!
//! A source lists calendars (name and color) and, per calendar, the events
//! that start inside a reporting window. The pipeline never retries or pages
//! through results; a source returns everything for the window in one call.
//!
//! ## Sources
//!
//! - **JSON**: calendars with colors and nested events, e.g. an export of a
//!   desktop calendar
//! - **CSV**: flat `calendar,start,end,title[,color]` rows
//! - **Memory**: calendars built in code, for tests and embedding
//!
//! ## Usage
//!
//! ```rust,no_run
//! use calsum::source::{open, CalendarSource};
//! use std::path::Path;
//!
//! let source = open(Path::new("calendars.json"), None)?;
//! let calendars = source.list_calendars()?;
//! # Ok::<(), calsum::libs::error::ReportError>(())
//! ```

use crate::libs::color::SourceColor;
use crate::libs::date_range::DateRange;
use crate::libs::error::{ReportError, Result};
use crate::libs::event::RawEvent;
use crate::libs::messages::Message;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod csv;
pub mod json;
pub mod memory;

pub use self::csv::CsvSource;
pub use self::json::JsonSource;
pub use self::memory::MemorySource;

/// Timestamp layouts accepted in source files, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// A calendar as listed by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarInfo {
    pub name: String,
    pub color: SourceColor,
}

impl CalendarInfo {
    pub fn new(name: &str, color: SourceColor) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }
}

/// Outcome of asking a source for permission to read calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Granted,
    Denied,
    TimedOut,
}

/// Supported source file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(InputFormat::Json),
            "csv" => Some(InputFormat::Csv),
            _ => None,
        }
    }
}

pub trait CalendarSource {
    /// Asks for permission to read calendars, waiting at most `timeout`.
    ///
    /// File-backed sources need no permission and grant immediately.
    fn request_access(&self, _timeout: Duration) -> AccessStatus {
        AccessStatus::Granted
    }

    /// All calendars known to the source, with their colors.
    fn list_calendars(&self) -> Result<Vec<CalendarInfo>>;

    /// Events of `calendar` whose start lies inside `range`.
    fn list_events(&self, calendar: &CalendarInfo, range: &DateRange) -> Result<Vec<RawEvent>>;
}

/// Opens a file-backed source, inferring the format from the extension when
/// `format` is not given.
pub fn open(path: &Path, format: Option<InputFormat>) -> Result<Box<dyn CalendarSource>> {
    if !path.exists() {
        return Err(ReportError::Source(Message::SourceFileNotFound(path.display().to_string()).to_string()));
    }
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| ReportError::Source(Message::SourceFormatUnknown(path.display().to_string()).to_string()))?;

    tracing::debug!(path = %path.display(), ?format, "opening calendar source");
    Ok(match format {
        InputFormat::Json => Box::new(JsonSource::from_path(path)?),
        InputFormat::Csv => Box::new(CsvSource::from_path(path)?),
    })
}

/// Parses a local wall-clock timestamp such as `2024-06-14T09:30:00`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| ReportError::Source(format!("invalid timestamp '{}'", value)))
}

/// Parses `#RRGGBB` or `RRGGBB` into fractional intensities.
/// Anything else is reported as an unavailable color.
pub fn parse_hex_color(value: &str) -> SourceColor {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return SourceColor::Unavailable;
    }
    let component = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map(|v| v as f64 / 255.0);
    match (component(0..2), component(2..4), component(4..6)) {
        (Ok(red), Ok(green), Ok(blue)) => SourceColor::rgb(red, green, blue),
        _ => SourceColor::Unavailable,
    }
}

/// Keeps the events whose start lies inside `range`.
fn within(events: &[RawEvent], range: &DateRange) -> Vec<RawEvent> {
    events.iter().filter(|event| range.contains(event.start)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::color::resolve_hex;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 6, 14).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-14T09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-14 09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2024-06-14 09:30 ").unwrap(), expected);
        assert!(parse_timestamp("14/06/2024 09:30").is_err());
    }

    #[test]
    fn test_parse_hex_color_round_trips_through_resolver() {
        assert_eq!(resolve_hex(&parse_hex_color("#1E90FF")), "1E90FF");
        assert_eq!(resolve_hex(&parse_hex_color("ff8000")), "FF8000");
        assert_eq!(parse_hex_color("blue"), SourceColor::Unavailable);
        assert_eq!(parse_hex_color(""), SourceColor::Unavailable);
    }

    #[test]
    fn test_input_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a/b.JSON")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("events.csv")), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_path(Path::new("events.ics")), None);
        assert_eq!(InputFormat::from_path(Path::new("events")), None);
    }
}
