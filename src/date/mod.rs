use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{JournalError, Result};

/// Normalized timestamp layout, e.g. `2014-05-27 10:00:00 +09:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Timestamps before this hour belong to the previous day's narrative.
pub const DAY_BOUNDARY_HOUR: u32 = 3;

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} [+-]\d{2}:\d{2}$").unwrap());
static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]\d{2}:\d{2}$").unwrap());

/// Parse a normalized timestamp into its wall-clock time.
///
/// The offset is validated but not applied: grouping works on the local time
/// the photo was taken, not on UTC.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if !TIMESTAMP_RE.is_match(s) {
        return None;
    }
    DateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Calendar date a wall-clock time is grouped under.
pub fn group_date(wall: NaiveDateTime) -> NaiveDate {
    let date = wall.date();
    if wall.hour() < DAY_BOUNDARY_HOUR {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

/// Parse a `±HH:MM` offset such as `+09:00`.
pub fn parse_timezone(s: &str) -> Result<FixedOffset> {
    if !OFFSET_RE.is_match(s) {
        return Err(JournalError::InvalidTimezone(s.to_string()));
    }
    DateTime::parse_from_str(&format!("2000-01-01 00:00:00 {s}"), TIMESTAMP_FORMAT)
        .map(|dt| *dt.offset())
        .map_err(|_| JournalError::InvalidTimezone(s.to_string()))
}

/// Render a unix time in the given offset using the normalized layout.
pub fn format_unix(secs: i64, nanos: u32, offset: FixedOffset) -> Option<String> {
    let utc = DateTime::from_timestamp(secs, nanos)?;
    Some(utc.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string())
}
