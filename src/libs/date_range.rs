//! Reporting window resolution.
//!
//! A report covers either today (`last_days == 0`) or exactly `last_days`
//! whole calendar days ending yesterday. Bounds are inclusive and snapped to
//! `00:00:00` and `23:59:59`.
//!
//! ```rust
//! use calsum::libs::date_range::DateRange;
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let range = DateRange::resolve(3, now).unwrap();
//! assert_eq!(range.start.to_string(), "2024-06-12 00:00:00");
//! assert_eq!(range.end.to_string(), "2024-06-14 23:59:59");
//! ```

use crate::libs::error::{ReportError, Result};
use crate::libs::messages::Message;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    last_days: i64,
}

impl DateRange {
    /// Computes the window for `last_days` relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidArgument`] when `last_days` is negative
    /// or reaches back before the earliest representable date. The value is
    /// never clamped.
    pub fn resolve(last_days: i64, now: NaiveDateTime) -> Result<Self> {
        if last_days < 0 {
            return Err(ReportError::InvalidArgument(Message::InvalidDays(last_days).to_string()));
        }

        let today = now.date();
        let (first_day, last_day) = if last_days == 0 {
            (today, today)
        } else {
            let first_day = today
                .checked_sub_days(Days::new(last_days.unsigned_abs()))
                .ok_or_else(|| ReportError::InvalidArgument(Message::DaysOutOfRange(last_days).to_string()))?;
            (first_day, today.pred_opt().unwrap_or(today))
        };

        Ok(Self {
            start: start_of_day(first_day),
            end: end_of_day(last_day),
            last_days,
        })
    }

    /// Whether `instant` falls inside the window, bounds included.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Divisor for per-day averages; never zero.
    pub fn days_in_period(&self) -> i64 {
        self.last_days.max(1)
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59 is always a valid wall-clock time for a naive date.
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_today_window() {
        let range = DateRange::resolve(0, at(2024, 6, 15, 10, 0, 0)).unwrap();
        assert_eq!(range.start, at(2024, 6, 15, 0, 0, 0));
        assert_eq!(range.end, at(2024, 6, 15, 23, 59, 59));
        assert_eq!(range.days_in_period(), 1);
    }

    #[test]
    fn test_last_three_days_excludes_today() {
        let range = DateRange::resolve(3, at(2024, 6, 15, 10, 0, 0)).unwrap();
        assert_eq!(range.start, at(2024, 6, 12, 0, 0, 0));
        assert_eq!(range.end, at(2024, 6, 14, 23, 59, 59));
        assert_eq!(range.days_in_period(), 3);
    }

    #[test]
    fn test_single_day_is_yesterday() {
        let range = DateRange::resolve(1, at(2024, 3, 1, 0, 30, 0)).unwrap();
        assert_eq!(range.start, at(2024, 2, 29, 0, 0, 0));
        assert_eq!(range.end, at(2024, 2, 29, 23, 59, 59));
    }

    #[test]
    fn test_negative_days_rejected() {
        let result = DateRange::resolve(-1, at(2024, 6, 15, 10, 0, 0));
        assert!(matches!(result, Err(ReportError::InvalidArgument(_))));
    }

    #[test]
    fn test_huge_day_count_is_rejected() {
        let now = at(2024, 6, 15, 10, 0, 0);
        assert!(matches!(DateRange::resolve(1_000_000_000, now), Err(ReportError::InvalidArgument(_))));
        assert!(matches!(DateRange::resolve(i64::MAX, now), Err(ReportError::InvalidArgument(_))));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::resolve(0, at(2024, 6, 15, 10, 0, 0)).unwrap();
        assert!(range.contains(at(2024, 6, 15, 0, 0, 0)));
        assert!(range.contains(at(2024, 6, 15, 23, 59, 59)));
        assert!(!range.contains(at(2024, 6, 16, 0, 0, 0)));
        assert!(!range.contains(at(2024, 6, 14, 23, 59, 59)));
    }
}
