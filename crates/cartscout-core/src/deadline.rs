//! Resolves weekday names used as shipping deadlines into concrete dates.
//!
//! All shipping arithmetic happens in a fixed reference zone (India Standard
//! Time, UTC+05:30, no daylight saving). Callers pass "now" explicitly so the
//! resolution is deterministic under test.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Offset, TimeZone, Utc, Weekday};

use crate::CoreError;

const REFERENCE_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// The fixed offset every delivery estimate is computed in.
#[must_use]
pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current wall-clock time in the reference zone.
#[must_use]
pub fn reference_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&reference_offset())
}

/// Parses a full English weekday name, ignoring case and surrounding
/// whitespace.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDay`] for anything other than the seven full
/// day names (abbreviations such as `"fri"` are rejected).
pub fn parse_weekday(name: &str) -> Result<Weekday, CoreError> {
    let normalized = name.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(day, _)| *day == normalized)
        .map(|(_, weekday)| *weekday)
        .ok_or_else(|| CoreError::InvalidDay(name.to_owned()))
}

/// Returns the date of the next `day` strictly after `now`'s date.
///
/// When `now` already falls on `day` the result is one week out, never today.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDay`] when `day` is not a weekday name.
pub fn resolve_deadline<Tz: TimeZone>(day: &str, now: &DateTime<Tz>) -> Result<NaiveDate, CoreError> {
    let target = parse_weekday(day)?;
    let today = now.weekday();

    let mut days_until =
        (7 + target.num_days_from_monday() - today.num_days_from_monday()) % 7;
    if days_until == 0 {
        days_until = 7;
    }

    let today_date = now.date_naive();
    Ok(today_date
        .checked_add_days(Days::new(u64::from(days_until)))
        .unwrap_or(today_date))
}
