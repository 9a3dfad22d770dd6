use chrono::{NaiveDate, NaiveDateTime};

/// Name used for events without a title.
pub const UNNAMED_EVENT: &str = "Unnamed Event";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A calendar event as delivered by a calendar source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: Option<String>,
}

impl RawEvent {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, title: Option<&str>) -> Self {
        Self {
            start,
            end,
            title: title.map(str::to_string),
        }
    }
}

/// An event reduced to what the summaries need.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    /// Day of the event start; events crossing midnight stay on their start day.
    pub event_date: NaiveDate,
    pub calendar_name: String,
    pub event_name: String,
    /// `(end - start)` in hours. Negative for malformed events, never clamped here.
    pub duration_hours: f64,
}

impl NormalizedEvent {
    /// Normalizes `raw` for the calendar `calendar_name`.
    ///
    /// The title is kept exactly as given; only a missing or blank title is
    /// replaced with [`UNNAMED_EVENT`].
    pub fn from_raw(raw: &RawEvent, calendar_name: &str) -> Self {
        let seconds = raw.end.signed_duration_since(raw.start).num_seconds();
        let event_name = match raw.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => UNNAMED_EVENT.to_string(),
        };

        Self {
            event_date: raw.start.date(),
            calendar_name: calendar_name.to_string(),
            event_name,
            duration_hours: seconds as f64 / SECONDS_PER_HOUR,
        }
    }
}
