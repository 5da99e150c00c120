//! Date normalization for event scheduling.
//!
//! The staff UI submits locale-formatted `DD/MM/YYYY` dates with an optional
//! `HH:MM AM/PM` time-of-day. Events are stored and sorted on the canonical
//! UTC timestamp produced here.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::DomainError;

/// Display time pinned onto all-day events.
pub const MIDNIGHT_DISPLAY: &str = "12:00 AM";

/// Convert a `DD/MM/YYYY` date and optional `HH:MM AM/PM` time into a
/// canonical UTC timestamp. An absent or empty time means midnight.
pub fn normalize(date: &str, time: Option<&str>) -> Result<DateTime<Utc>, DomainError> {
    let day = parse_date(date)?;

    let time_of_day = match time {
        Some(t) if !t.trim().is_empty() => NaiveTime::parse_from_str(t.trim(), "%I:%M %p")
            .map_err(|_| DomainError::invalid_date(format!("expected HH:MM AM/PM, got {t:?}")))?,
        _ => NaiveTime::MIN,
    };

    Ok(day.and_time(time_of_day).and_utc())
}

/// Re-format a canonical timestamp as the UI-facing `DD/MM/YYYY` string.
pub fn display_date(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

fn parse_date(date: &str) -> Result<NaiveDate, DomainError> {
    // Fixed 10-byte layout: day at 0..2, month at 3..5, year at 6..10.
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return Err(DomainError::invalid_date(format!(
            "expected DD/MM/YYYY, got {date:?}"
        )));
    }

    NaiveDate::parse_from_str(date, "%d/%m/%Y")
        .map_err(|_| DomainError::invalid_date(format!("not a calendar date: {date:?}")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn date_without_time_is_midnight() {
        let ts = normalize("07/09/2016", None).expect("valid date");
        assert_eq!(ts, Utc.with_ymd_and_hms(2016, 9, 7, 0, 0, 0).unwrap());
    }

    #[test]
    fn empty_time_is_midnight() {
        let ts = normalize("07/09/2016", Some("")).expect("valid date");
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.minute(), 0);
    }

    #[test]
    fn pm_time_is_applied() {
        let ts = normalize("07/09/2016", Some("11:30 PM")).expect("valid date and time");
        assert_eq!(ts, Utc.with_ymd_and_hms(2016, 9, 7, 23, 30, 0).unwrap());
    }

    #[test]
    fn twelve_am_is_midnight() {
        let ts = normalize("01/01/2020", Some("12:00 AM")).expect("valid date and time");
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn display_round_trips() {
        let ts = normalize("07/09/2016", Some("11:30 PM")).expect("valid date and time");
        assert_eq!(display_date(ts), "07/09/2016");
    }

    #[test]
    fn rejects_wrong_layout() {
        assert!(normalize("2016-09-07", None).is_err());
        assert!(normalize("7/9/2016", None).is_err());
        assert!(normalize("07/09/16", None).is_err());
    }

    #[test]
    fn rejects_non_calendar_dates() {
        assert!(normalize("32/01/2016", None).is_err());
        assert!(normalize("29/02/2015", None).is_err());
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(normalize("07/09/2016", Some("25:00 PM")).is_err());
        assert!(normalize("07/09/2016", Some("11.30pm")).is_err());
    }
}
