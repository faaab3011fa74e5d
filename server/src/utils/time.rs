//! Lenient parsing of date query parameters

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Years a date parameter may fall in (what RFC 3339 can express)
pub const DATE_PARAM_YEARS: RangeInclusive<i32> = 0..=9999;

/// Parse an ISO-8601 instant or a bare `YYYY-MM-DD` day
///
/// Blank, unparseable or out-of-range input yields `None` (with a warning),
/// so a bad parameter behaves as if it had not been sent.
pub fn parse_date_param(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    let Some(dt) = parse_instant(raw) else {
        tracing::warn!(value = raw, "Ignoring unparseable date parameter");
        return None;
    };
    if !DATE_PARAM_YEARS.contains(&dt.year()) {
        tracing::warn!(value = raw, year = dt.year(), "Ignoring out-of-range date parameter");
        return None;
    }
    Some(dt)
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    None
}
