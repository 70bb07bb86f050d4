//! Money and date display helpers.
//!
//! Both return `None` for empty input instead of a placeholder so views can
//! decide what to show.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Display pattern `YYYY-MM-DD hh:mm` (12-hour clock).
const DATE_PATTERN: &str = "%Y-%m-%d %I:%M";

/// `12.5` → `"12.50 €"`. Zero and NaN yield `None`. Half cents round away
/// from zero.
#[allow(clippy::float_cmp)]
pub fn format_money(value: f64) -> Option<String> {
    if value == 0.0 || value.is_nan() {
        return None;
    }
    let cents = (value * 100.0).round() / 100.0;
    Some(format!("{cents:.2} €"))
}

/// Format an ISO-8601 date or date-time in the browser's local time zone.
pub fn format_date(value: &str) -> Option<String> {
    format_date_in(value, &Local)
}

/// Format a timestamp in the browser's local time zone.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    format_datetime_in(value, &Local)
}

pub fn format_date_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let instant = parse_instant(value, tz)?;
    Some(instant.format(DATE_PATTERN).to_string())
}

pub fn format_datetime_in<Tz: TimeZone>(value: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(tz).format(DATE_PATTERN).to_string()
}

/// Offset-qualified input is converted into `tz`; naive input is read as local to `tz`.
fn parse_instant<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(tz));
    }
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))?;
    tz.from_local_datetime(&naive).earliest()
}
