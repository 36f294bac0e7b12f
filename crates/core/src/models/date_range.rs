use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::errors::CoreError;

/// An inclusive calendar date range with `start <= end`.
///
/// `start == end` is a valid range; the stricter `start < end` rule only
/// applies to user edits and lives in `DateValidator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawRange> for DateRange {
    type Error = CoreError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange {
                start: calendar::format_iso(start),
                end: calendar::format_iso(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build from two ISO strings, e.g. values restored from session storage.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Self::new(calendar::parse_iso(start)?, calendar::parse_iso(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// `(start, end)` as `YYYY-MM-DD` strings.
    pub fn to_iso_pair(&self) -> (String, String) {
        (calendar::format_iso(self.start), calendar::format_iso(self.end))
    }
}
