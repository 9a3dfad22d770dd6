//! Error taxonomy of the report pipeline.
//!
//! Only the absence of source data, a refused calendar access or a failed
//! write terminate a run. Malformed colors and missing titles are recovered
//! locally and never show up here.

use crate::libs::messages::Message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A caller passed an argument outside its domain, e.g. a negative day count.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The calendar source returned no calendars at all.
    #[error("{}", Message::NoCalendarsFound)]
    NoData,

    #[error("{}", Message::CalendarAccessDenied)]
    AccessDenied,

    #[error("{}", Message::CalendarAccessTimedOut(.0.clone()))]
    AccessTimedOut(u64),

    /// The calendar source could not be read or parsed.
    #[error("{}", Message::SourceReadFailed(.0.clone()))]
    Source(String),

    /// The document writer could not persist the report.
    #[error("Failed to write report: {0}")]
    WriteFailure(String),
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::WriteFailure(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Source(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Source(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
