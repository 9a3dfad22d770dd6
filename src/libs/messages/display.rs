//! Display implementation for calsum application messages.
//!
//! Every user-facing text lives here, so the command layer only deals with
//! structured `Message` values and the wording stays consistent across the
//! console summary, log lines and error reports.
//!
//! ```rust
//! use calsum::libs::messages::Message;
//!
//! let message = Message::ReportSaved("report.xlsx".to_string());
//! assert_eq!(message.to_string(), "Report saved to report.xlsx");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === REPORT MESSAGES ===
            Message::ReportPeriod(start, end) => format!("Reporting period: {} - {}", start, end),
            Message::ReportSaved(path) => format!("Report saved to {}", path),
            Message::ReportTotalsHeader => "Total hours per calendar:".to_string(),
            Message::EventsCollected(events, calendars) => {
                format!("Collected {} event(s) from {} calendar(s)", events, calendars)
            }
            Message::EventsSkippedNegative(count) => {
                format!("Skipped {} event(s) that end before they start", count)
            }
            Message::NoCalendarsFound => {
                "No calendars found. Please ensure the source contains at least one calendar.".to_string()
            }
            Message::NoEventsInPeriod => "No events found in the reporting period.".to_string(),

            // === SOURCE MESSAGES ===
            Message::SourceNotSpecified => {
                "No calendar source given. Pass --source or set one with 'calsum init'.".to_string()
            }
            Message::SourceFileNotFound(path) => format!("Calendar source not found: {}", path),
            Message::SourceFormatUnknown(path) => {
                format!("Cannot infer the format of {}; use --input-format json|csv", path)
            }
            Message::SourceReadFailed(error) => format!("Failed to read calendar source: {}", error),
            Message::CalendarAccessDenied => {
                "Access to calendars is denied. Please grant access and try again.".to_string()
            }
            Message::CalendarAccessTimedOut(secs) => {
                format!("Calendar access was not granted within {} seconds", secs)
            }

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigNotFound => "No configuration file to remove".to_string(),
            Message::ConfigModuleReport => "Report settings".to_string(),

            // === ARGUMENT MESSAGES ===
            Message::InvalidDays(days) => format!("Number of days must not be negative, got {}", days),
            Message::DaysOutOfRange(days) => format!("Number of days reaches too far into the past: {}", days),
            Message::DecimalPlacesOutOfRange(places, max) => {
                format!("Decimal places must be between 0 and {}, got {}", max, places)
            }

            // === PROMPTS ===
            Message::PromptDefaultDays => "Default number of days (0 = today)".to_string(),
            Message::PromptOutputDir => "Directory for generated reports".to_string(),
            Message::PromptFileName => "Report file name".to_string(),
            Message::PromptDecimalPlaces => "Decimal places for hour values".to_string(),
            Message::PromptNegativeDurations => "Events that end before they start".to_string(),
            Message::PromptAccessTimeout => "Calendar access timeout (seconds)".to_string(),
            Message::PromptSource => "Default calendar source file (empty for none)".to_string(),
        };

        write!(f, "{}", text)
    }
}
