//! Day ranges and lenient instant parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an instant from the wire.
///
/// Accepts RFC 3339, the same without a seconds field or with a lowercase
/// `z` suffix (both show up in real client traffic), and a bare
/// `YYYY-MM-DD` (parsed as midnight). Naive datetimes are taken as UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// The closed interval covering one calendar day, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// `[00:00:00, 23:59:59]` for the given date.
    pub fn of(day: NaiveDate) -> Self {
        DayRange {
            start: day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
            end: day.and_hms_opt(23, 59, 59).unwrap_or_default().and_utc(),
        }
    }

    /// Parse a day from the wire. A time-of-day component is truncated to
    /// its date.
    pub fn parse(value: &str) -> Option<Self> {
        parse_instant(value).map(|dt| DayRange::of(dt.date_naive()))
    }
}
