#[derive(Debug, Clone)]
pub enum Message {
    // === REPORT MESSAGES ===
    ReportPeriod(String, String), // start, end
    ReportSaved(String),          // path
    ReportTotalsHeader,
    EventsCollected(usize, usize), // events, calendars
    EventsSkippedNegative(usize),
    NoCalendarsFound,
    NoEventsInPeriod,

    // === SOURCE MESSAGES ===
    SourceNotSpecified,
    SourceFileNotFound(String),
    SourceFormatUnknown(String),
    SourceReadFailed(String),
    CalendarAccessDenied,
    CalendarAccessTimedOut(u64), // seconds

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleReport,

    // === ARGUMENT MESSAGES ===
    InvalidDays(i64),
    DaysOutOfRange(i64),
    DecimalPlacesOutOfRange(u32, u32), // given, max

    // === PROMPTS ===
    PromptDefaultDays,
    PromptOutputDir,
    PromptFileName,
    PromptDecimalPlaces,
    PromptNegativeDurations,
    PromptAccessTimeout,
    PromptSource,
}
