//! Calendar dates typed as `DD/MM/YYYY` and their machine (ISO 8601) form.
//!
//! Validation is strict: the input must match the display pattern exactly and name a real
//! day between 1900 and the current year. The converters are deliberately lenient and do
//! not validate, so callers must check a date before converting it.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Earliest accepted year for a birth date
pub const MIN_YEAR: i32 = 1900;

lazy_static! {
    // `[0-9]` rather than `\d`, which would also accept non-ASCII digits
    static ref DISPLAY_DATE_PATTERN: Regex =
        Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").unwrap();
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum DateConversionError {
    #[error("Expected a date in the DD/MM/YYYY form")]
    MalformedDisplayDate,

    #[error("The date falls outside of the representable range")]
    OutOfRange,

    #[error("Expected an ISO 8601 instant")]
    MalformedInstant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl CalendarDate {
    /// Parses a string matching the strict display pattern. Ranges are not checked.
    pub fn parse_display(display: &str) -> Option<Self> {
        if !DISPLAY_DATE_PATTERN.is_match(display) {
            return None;
        }
        // The pattern guarantees ASCII digits at fixed offsets
        Some(CalendarDate {
            day: display[0..2].parse().ok()?,
            month: display[3..5].parse().ok()?,
            year: display[6..10].parse().ok()?,
        })
    }

    pub fn is_valid_in_year(&self, current_year: i32) -> bool {
        if !(1..=12).contains(&self.month) {
            return false;
        }
        if !(1..=31).contains(&self.day) {
            return false;
        }
        if self.day > days_in_month(self.month, self.year) {
            return false;
        }
        (MIN_YEAR..=current_year).contains(&self.year)
    }

    pub fn to_display(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for a month outside of 1-12.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Checks a display date against the current calendar year.
///
/// The answer changes when the year rolls over; use [is_valid_date_in_year] when a stable
/// result is needed.
pub fn is_valid_date(display: &str) -> bool {
    is_valid_date_in_year(display, Utc::now().year())
}

pub fn is_valid_date_in_year(display: &str, current_year: i32) -> bool {
    CalendarDate::parse_display(display)
        .map(|date| date.is_valid_in_year(current_year))
        .unwrap_or(false)
}

/// Converts `DD/MM/YYYY` into the UTC midnight instant, e.g. `2024-02-29T00:00:00.000Z`.
///
/// No validation happens here. Components outside of their range roll over into the
/// neighbouring months and years, so `31/02/2024` becomes the 2nd of March and `00/01/2020`
/// becomes the 31st of December 2019.
pub fn to_machine_form(display: &str) -> Result<String, DateConversionError> {
    let mut components = display.split('/');
    let mut next_component = || -> Result<i64, DateConversionError> {
        components
            .next()
            .and_then(|c| c.trim().parse::<i64>().ok())
            .ok_or(DateConversionError::MalformedDisplayDate)
    };
    let day = next_component()?;
    let month = next_component()?;
    let year = next_component()?;

    let midnight = rolled_over_date(day, month, year)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or(DateConversionError::OutOfRange)?;
    Ok(Utc
        .from_utc_datetime(&midnight)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Converts an ISO 8601 instant (or a bare `YYYY-MM-DD`) into `DD/MM/YYYY`, using the UTC
/// calendar day of the instant.
pub fn to_display_form(machine: &str) -> Result<String, DateConversionError> {
    let machine = machine.trim();
    let date = match DateTime::parse_from_rfc3339(machine) {
        Ok(instant) => instant.with_timezone(&Utc).date_naive(),
        Err(_) => NaiveDate::parse_from_str(machine, "%Y-%m-%d")
            .map_err(|_| DateConversionError::MalformedInstant)?,
    };
    Ok(CalendarDate {
        day: date.day(),
        month: date.month(),
        year: date.year(),
    }
    .to_display())
}

/// Builds a date the way a day/month/year triple overflows: months beyond 12 carry into
/// the year, days beyond the month carry into the following months.
fn rolled_over_date(day: i64, month: i64, year: i64) -> Option<NaiveDate> {
    let total_months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month = u32::try_from(total_months.rem_euclid(12) + 1).ok()?;
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;

    let day_offset = day.checked_sub(1)?;
    if day_offset >= 0 {
        first_of_month.checked_add_days(Days::new(day_offset.unsigned_abs()))
    } else {
        first_of_month.checked_sub_days(Days::new(day_offset.unsigned_abs()))
    }
}
