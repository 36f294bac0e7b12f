//! Calendar helpers shared by the period resolver, the validator and the
//! chart assembler. All dates are UTC calendar dates (`NaiveDate`).

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::errors::CoreError;

/// ISO date format used on every external boundary.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Chart label format, e.g. `"Tue, 05 Jun 2018"`.
pub const LABEL_FORMAT: &str = "%a, %d %b %Y";

/// Zero-pad a month or day number to two digits.
pub fn pad(num: u32) -> String {
    format!("{num:02}")
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    format!("{:04}-{}-{}", date.year(), pad(date.month()), pad(date.day()))
}

/// Parse a strict `YYYY-MM-DD` date: four-digit year, two-digit month and
/// day, no surrounding whitespace.
pub fn parse_iso(value: &str) -> Result<NaiveDate, CoreError> {
    let shaped = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(CoreError::InvalidDate(format!("'{value}': expected YYYY-MM-DD")));
    }

    NaiveDate::parse_from_str(value, ISO_FORMAT)
        .map_err(|e| CoreError::InvalidDate(format!("'{value}': {e}")))
}

/// Fixed-width human label for chart axes and tooltips.
pub fn format_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}

/// Saturday and Sunday are excluded from charts.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Step back `months` calendar months, carrying into the previous year(s)
/// and clamping the day to the end of the target month (May 31 → Apr 30).
pub fn months_before(date: NaiveDate, months: u32) -> Result<NaiveDate, CoreError> {
    date.checked_sub_months(Months::new(months)).ok_or_else(|| {
        CoreError::InvalidDate(format!("{date} minus {months} months is out of range"))
    })
}

/// Step back whole calendar years. Feb 29 falls back to Feb 28.
pub fn years_before(date: NaiveDate, years: u32) -> Result<NaiveDate, CoreError> {
    months_before(date, years.saturating_mul(12))
}

/// January 1st of the date's year.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}
