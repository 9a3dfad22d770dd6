use super::{within, AccessStatus, CalendarInfo, CalendarSource};
use crate::libs::color::SourceColor;
use crate::libs::date_range::DateRange;
use crate::libs::error::Result;
use crate::libs::event::RawEvent;
use std::time::Duration;

/// Calendars held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    calendars: Vec<(CalendarInfo, Vec<RawEvent>)>,
    access: AccessStatus,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            calendars: Vec::new(),
            access: AccessStatus::Granted,
        }
    }

    pub fn with_calendar(mut self, name: &str, color: SourceColor, events: Vec<RawEvent>) -> Self {
        self.calendars.push((CalendarInfo::new(name, color), events));
        self
    }

    /// Makes [`CalendarSource::request_access`] answer with `access`.
    pub fn with_access(mut self, access: AccessStatus) -> Self {
        self.access = access;
        self
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSource for MemorySource {
    fn request_access(&self, _timeout: Duration) -> AccessStatus {
        self.access
    }

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
