//! # Temporal Helpers: UTC Dates
//!
//! Dates inside documents are `DateTime<Utc>`. This module parses them from
//! text, converts them to and from epoch milliseconds (their numeric
//! interpretation for range checks), and renders them in the two formats
//! officer uses: ISO 8601 for serialization and a calendar sentence form for
//! range messages.
//!
//! All rendering happens in UTC so that reports are identical on every
//! machine.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};

/// Parse a date from text.
///
/// Accepts RFC 3339 with any offset (converted to UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC). Surrounding whitespace is ignored.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64
}

/// Build a date from milliseconds since the Unix epoch.
///
/// Returns `None` for non-finite input or instants chrono cannot represent.
pub fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
///
/// Milliseconds are included only when non-zero.
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    if dt.nanosecond() / 1_000_000 == 0 {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

/// Render as a calendar sentence fragment, e.g. `Jan 5, 2020 1:05:09 PM`.
///
/// Abbreviated month, unpadded day, four-digit year, 12-hour clock with
/// zero-padded minutes and seconds.
pub fn calendar_string(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y %-I:%M:%S %p").to_string()
}
