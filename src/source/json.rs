//! JSON calendar source.
//!
//! Expected document layout:
//!
//! ```json
//! {
//!   "calendars": [
//!     {
//!       "name": "Work",
//!       "color": { "red": 0.12, "green": 0.56, "blue": 1.0 },
//!       "events": [
//!         { "start": "2024-06-14T09:00:00", "end": "2024-06-14T09:30:00", "title": "Standup" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `color` may also be a `[red, green, blue]` array or a `"#RRGGBB"` string.
//! A missing or unreadable color is passed on as unavailable and resolved to
//! the fallback color later; it never fails the load.

use super::{parse_hex_color, parse_timestamp, within, CalendarInfo, CalendarSource};
use crate::libs::color::SourceColor;
use crate::libs::date_range::DateRange;
use crate::libs::error::{ReportError, Result};
use crate::libs::event::RawEvent;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    calendars: Vec<JsonCalendar>,
}

#[derive(Debug, Deserialize)]
struct JsonCalendar {
    name: String,
    #[serde(default)]
    color: Value,
    #[serde(default)]
    events: Vec<JsonEvent>,
}

#[derive(Debug, Deserialize)]
struct JsonEvent {
    start: String,
    end: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JsonSource {
    calendars: Vec<(CalendarInfo, Vec<RawEvent>)>,
}

impl JsonSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::Source(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let document: JsonDocument = serde_json::from_str(content)?;
        let calendars = document
            .calendars
            .into_iter()
            .map(|calendar| {
                let events = calendar
                    .events
                    .iter()
                    .map(|event| {
                        Ok(RawEvent {
                            start: parse_timestamp(&event.start)?,
                            end: parse_timestamp(&event.end)?,
                            title: event.title.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((CalendarInfo::new(&calendar.name, parse_color(&calendar.color)), events))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { calendars })
    }
}

impl CalendarSource for JsonSource {
    fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        Ok(self.calendars.iter().map(|(info, _)| info.clone()).collect())
    }

    fn list_events(&self, calendar: &CalendarInfo, range: &DateRange) -> Result<Vec<RawEvent>> {
        Ok(self
            .calendars
            .iter()
            .filter(|(info, _)| info.name == calendar.name)
            .flat_map(|(_, events)| within(events, range))
            .collect())
    }
}

fn parse_color(value: &Value) -> SourceColor {
    match value {
        Value::Object(map) => {
            let component = |key: &str| map.get(key).and_then(Value::as_f64);
            match (component("red"), component("green"), component("blue")) {
                (Some(red), Some(green), Some(blue)) => SourceColor::rgb(red, green, blue),
                _ => SourceColor::Unavailable,
            }
        }
        Value::Array(items) if items.len() == 3 => match (items[0].as_f64(), items[1].as_f64(), items[2].as_f64()) {
            (Some(red), Some(green), Some(blue)) => SourceColor::rgb(red, green, blue),
            _ => SourceColor::Unavailable,
        },
        Value::String(hex) => parse_hex_color(hex),
        _ => SourceColor::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const DOCUMENT: &str = r##"{
        "calendars": [
            {
                "name": "Work",
                "color": { "red": 0.0, "green": 0.0, "blue": 1.0 },
                "events": [
                    { "start": "2024-06-14T09:00:00", "end": "2024-06-14T10:30:00", "title": "Planning" },
                    { "start": "2024-06-15T09:00:00", "end": "2024-06-15T10:00:00", "title": "Too late" }
                ]
            },
            { "name": "Home", "color": "#00FF00" },
            { "name": "Broken", "color": "purple-ish" }
        ]
    }"##;

    fn range() -> DateRange {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 0, 0).unwrap();
        DateRange::resolve(1, now).unwrap()
    }

    #[test]
    fn test_lists_calendars_with_colors() {
        let source = JsonSource::from_json(DOCUMENT).unwrap();
        let calendars = source.list_calendars().unwrap();
        assert_eq!(calendars.len(), 3);
        assert_eq!(calendars[0].color, SourceColor::rgb(0.0, 0.0, 1.0));
        assert_eq!(calendars[1].color, SourceColor::rgb(0.0, 1.0, 0.0));
        assert_eq!(calendars[2].color, SourceColor::Unavailable);
    }

    #[test]
    fn test_events_are_filtered_by_window() {
        let source = JsonSource::from_json(DOCUMENT).unwrap();
        let work = CalendarInfo::new("Work", SourceColor::Unavailable);
        let events = source.list_events(&work, &range()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Planning"));
    }

    #[test]
    fn test_invalid_document_is_a_source_error() {
        assert!(matches!(JsonSource::from_json("{ not json"), Err(ReportError::Source(_))));
        let bad_time = r#"{"calendars":[{"name":"W","events":[{"start":"yesterday","end":"today"}]}]}"#;
        assert!(matches!(JsonSource::from_json(bad_time), Err(ReportError::Source(_))));
    }
}
