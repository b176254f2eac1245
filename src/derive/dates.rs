//! Date parsing and calendar arithmetic.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a snapshot date or date-time, keeping only the calendar date.
///
/// Blank or unparseable input yields `None`, never an error.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_datetime(raw).map(|dt| dt.date())
}

/// Parse a date-time; a bare date is taken at midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    // Offsets written by some exporters ("2025-01-02T03:04:05+00:00").
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Step forward one day at a time from `start` (exclusive) until the
/// `occurrence`-th `weekday` is reached.
pub fn nth_weekday_after(start: NaiveDate, weekday: Weekday, occurrence: u32) -> NaiveDate {
    let mut current = start;
    let mut seen = 0;
    while seen < occurrence {
        current += Duration::days(1);
        if current.weekday() == weekday {
            seen += 1;
        }
    }
    current
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let start = month_start(date);
    start.checked_add_months(chrono::Months::new(1)).unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    #[test]
    fn parses_dates_and_datetimes() {
        assert_eq!(parse_date("2025-08-01"), Some(d(2025, 8, 1)));
        assert_eq!(parse_date("2025-08-01 13:45:00"), Some(d(2025, 8, 1)));
        assert_eq!(parse_date("2025-08-01 13:45:00.123"), Some(d(2025, 8, 1)));
        assert_eq!(parse_date("2025-08-01T09:00:00"), Some(d(2025, 8, 1)));
        assert_eq!(parse_date("08/01/2025"), Some(d(2025, 8, 1)));
        assert_eq!(parse_date(" 1900-01-01 00:00:00 "), Some(d(1900, 1, 1)));
    }

    #[test]
    fn garbage_parses_to_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("NaT"), None);
        assert_eq!(parse_date("2025-13-45"), None);
    }

    #[test]
    fn friday_start_lands_three_weeks_later() {
        let friday = d(2025, 8, 1);
        assert_eq!(friday.weekday(), Weekday::Fri);
        assert_eq!(nth_weekday_after(friday, Weekday::Fri, 3), d(2025, 8, 22));
    }

    #[test]
    fn midweek_start_counts_the_same_week_friday() {
        // Wednesday 2025-08-06 -> Fridays 08, 15, 22.
        assert_eq!(nth_weekday_after(d(2025, 8, 6), Weekday::Fri, 3), d(2025, 8, 22));
        // Saturday 2025-08-02 -> Fridays 08, 15, 22.
        assert_eq!(nth_weekday_after(d(2025, 8, 2), Weekday::Fri, 3), d(2025, 8, 22));
    }

    #[test]
    fn days_between_can_be_negative() {
        assert_eq!(days_between(d(2025, 8, 10), d(2025, 8, 1)), -9);
        assert_eq!(days_between(d(2025, 8, 1), d(2025, 8, 10)), 9);
    }

    #[test]
    fn month_helpers_cross_year_boundary() {
        assert_eq!(month_start(d(2025, 12, 17)), d(2025, 12, 1));
        assert_eq!(next_month(d(2025, 12, 17)), d(2026, 1, 1));
    }
}
