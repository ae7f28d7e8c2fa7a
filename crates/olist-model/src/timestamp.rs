//! Timestamp coercion and calendar helpers

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Naive layouts tried in order; `%.f` also matches a missing fraction.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a purchase timestamp from its textual form.
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.fff]`, the `T`-separated variant, RFC 3339
/// (converted to UTC) and a bare `YYYY-MM-DD` (midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Last whole second of `date` (23:59:59).
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::seconds(86_399)
}

/// Calendar month label in `YYYY-MM` form.
#[must_use]
pub fn month_label(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Month bucket key of a timestamp; orders chronologically.
#[must_use]
pub(crate) fn month_key(ts: &NaiveDateTime) -> (i32, u32) {
    (ts.year(), ts.month())
}
