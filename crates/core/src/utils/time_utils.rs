use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::constants::QUERY_DATE_FORMAT;

/// Naive timestamp layouts the backend has been seen to emit, tried in order.
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses an effective date sent by the backend.
///
/// Accepts RFC 3339 timestamps, naive timestamps (taken as UTC) and bare
/// `YYYY-MM-DD` dates (taken as midnight UTC). Returns `None` for anything else.
pub fn parse_ledger_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, QUERY_DATE_FORMAT)
        .ok()
        .map(start_of_day)
}

/// Midnight UTC on the given date.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Formats a date the way the backend expects it in query strings.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let parsed = parse_ledger_date("2024-01-05").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offset() {
        let parsed = parse_ledger_date("2024-01-05T01:30:00+05:00").unwrap();
        assert_eq!(parsed.day(), 4);
        assert_eq!(parsed.hour(), 20);
    }

    #[test]
    fn test_parse_naive_timestamps() {
        let with_fraction = parse_ledger_date("2024-03-10T08:15:30.250").unwrap();
        assert_eq!(with_fraction.minute(), 15);

        let spaced = parse_ledger_date("2024-03-10 08:15:30").unwrap();
        assert_eq!(spaced.second(), 30);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_ledger_date("").is_none());
        assert!(parse_ledger_date("05/01/2024").is_none());
        assert!(parse_ledger_date("yesterday").is_none());
    }

    #[test]
    fn test_format_query_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(format_query_date(date), "2024-02-09");
    }
}
