//! CSV calendar source.
//!
//! One event per row with the header `calendar,start,end,title`. An optional
//! `color` column (`#RRGGBB`) sets the calendar color; the first non-empty
//! value per calendar wins. Calendars are listed in first-seen order.

use super::{parse_hex_color, parse_timestamp, within, CalendarInfo, CalendarSource};
use crate::libs::color::SourceColor;
use crate::libs::date_range::DateRange;
use crate::libs::error::Result;
use crate::libs::event::RawEvent;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    calendar: String,
    start: String,
    end: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    calendars: Vec<(CalendarInfo, Vec<RawEvent>)>,
}

impl CsvSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = ::csv::ReaderBuilder::new().trim(::csv::Trim::All).from_path(path)?;
        Self::from_csv_reader(reader)
    }

    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let reader = ::csv::ReaderBuilder::new().trim(::csv::Trim::All).from_reader(input);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: Read>(mut reader: ::csv::Reader<R>) -> Result<Self> {
        let mut source = CsvSource::default();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let event = RawEvent {
                start: parse_timestamp(&row.start)?,
                end: parse_timestamp(&row.end)?,
                title: row.title.filter(|title| !title.is_empty()),
            };
            let color = row.color.as_deref().map(parse_hex_color).unwrap_or_default();
            source.push(&row.calendar, color, event);
        }
        Ok(source)
    }

    fn push(&mut self, calendar: &str, color: SourceColor, event: RawEvent) {
        match self.calendars.iter_mut().find(|(info, _)| info.name == calendar) {
            Some((info, events)) => {
                if info.color == SourceColor::Unavailable {
                    info.color = color;
                }
                events.push(event);
            }
            None => self.calendars.push((CalendarInfo::new(calendar, color), vec![event])),
        }
    }
}

impl CalendarSource for CsvSource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::error::ReportError;

    const ROWS: &str = "\
calendar,start,end,title,color
Work,2024-06-14 09:00,2024-06-14 10:00,Standup,
Home,2024-06-14 18:00,2024-06-14 19:30,,#FF0000
Work,2024-06-13 13:00,2024-06-13 15:00,Review,#0000FF
";

    #[test]
    fn test_calendars_in_first_seen_order() {
        let source = CsvSource::from_reader(ROWS.as_bytes()).unwrap();
        let calendars = source.list_calendars().unwrap();
        let names: Vec<_> = calendars.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Home"]);
        assert_eq!(calendars[0].color, SourceColor::rgb(0.0, 0.0, 1.0));
        assert_eq!(calendars[1].color, SourceColor::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_blank_title_becomes_none() {
        let source = CsvSource::from_reader(ROWS.as_bytes()).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let range = DateRange::resolve(3, now).unwrap();
        let home = CalendarInfo::new("Home", SourceColor::Unavailable);
        let events = source.list_events(&home, &range).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, None);
    }

    #[test]
    fn test_missing_column_is_a_source_error() {
        let result = CsvSource::from_reader("calendar,start\nWork,2024-06-14 09:00\n".as_bytes());
        assert!(matches!(result, Err(ReportError::Source(_))));
    }
}
