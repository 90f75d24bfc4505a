use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parses a record date into Unix seconds (UTC).
///
/// Offsets are honoured when present; naive values are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
    }
    None
}

/// Sort position of records whose date is missing or unparseable.
///
/// Below every real date, including pre-1970 ones, so undated records always
/// sit at the oldest end.
pub const UNDATED: i64 = i64::MIN;

/// Sort projection for a parsed date.
pub fn sort_timestamp(parsed: Option<i64>) -> i64 {
    parsed.unwrap_or(UNDATED)
}

pub fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dates_parse_as_utc_midnight() {
        assert_eq!(parse_timestamp("2023-01-01"), Some(1_672_531_200));
        assert_eq!(parse_timestamp("01/01/2023"), Some(1_672_531_200));
    }

    #[test]
    fn datetimes_with_and_without_offsets() {
        assert_eq!(parse_timestamp("2023-01-01T00:00:00Z"), Some(1_672_531_200));
        assert_eq!(parse_timestamp("2023-01-01T01:00:00+01:00"), Some(1_672_531_200));
        assert_eq!(parse_timestamp("2023-01-01 00:00:30"), Some(1_672_531_230));
        assert_eq!(
            parse_timestamp("2023-01-01T00:00:00.250"),
            Some(1_672_531_200)
        );
    }

    #[test]
    fn garbage_sorts_below_every_real_date() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(sort_timestamp(parse_timestamp("2023-13-45")), UNDATED);
        assert_eq!(sort_timestamp(parse_timestamp("")), UNDATED);

        let sixties = parse_timestamp("1965-07-01").unwrap();
        assert!(sixties < 0);
        assert!(sort_timestamp(None) < sort_timestamp(Some(sixties)));
    }

    #[test]
    fn format_round_trips_day() {
        assert_eq!(format_timestamp(1_672_531_200), "2023-01-01");
    }
}
