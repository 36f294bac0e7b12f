use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::calendar;
use crate::errors::CoreError;
use crate::models::date_range::DateRange;

/// How far back a custom start date may go.
pub const MAX_LOOKBACK_YEARS: u32 = 5;

/// Which end of the date range a user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Start,
    End,
}

impl FromStr for Boundary {
    type Err = CoreError;

    /// Accepts both the range names (`start`/`end`) and the date-input ids
    /// (`from`/`to`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "from" => Ok(Boundary::Start),
            "end" | "to" => Ok(Boundary::End),
            other => Err(CoreError::ValidationError(format!("Unknown date boundary: {other}"))),
        }
    }
}

/// Why a date edit was refused. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRejection {
    NotADate,
    EndAfterToday,
    StartTooOld,
    StartNotBeforeEnd,
}

impl std::fmt::Display for DateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            DateRejection::NotADate => "Value must be a date",
            DateRejection::EndAfterToday => "End date must not be after today's date",
            DateRejection::StartTooOld => "Start date must be within the last 5 years",
            DateRejection::StartNotBeforeEnd => "Start date must be before end date",
        };
        f.write_str(msg)
    }
}

/// Outcome of validating a date edit. A rejection is an expected result that
/// drives inline feedback, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValidation {
    Accepted(NaiveDate),
    Rejected(DateRejection),
}

impl DateValidation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DateValidation::Accepted(_))
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            DateValidation::Accepted(_) => None,
            DateValidation::Rejected(reason) => Some(reason.to_string()),
        }
    }
}

/// Validates user edits of the chart's start/end dates.
pub struct DateValidator;

impl DateValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check an edited boundary against the current range. Rules run in
    /// order and the first failure wins:
    /// 1. the value parses as `YYYY-MM-DD`
    /// 2. an end date is not after `today`
    /// 3. a start date is not before `today` minus five calendar years
    /// 4. start stays strictly before end
    pub fn validate(
        &self,
        boundary: Boundary,
        value: &str,
        current: &DateRange,
        today: NaiveDate,
    ) -> DateValidation {
        let date = match calendar::parse_iso(value) {
            Ok(date) => date,
            Err(_) => return DateValidation::Rejected(DateRejection::NotADate),
        };

        if boundary == Boundary::End && date > today {
            return DateValidation::Rejected(DateRejection::EndAfterToday);
        }

        if boundary == Boundary::Start {
            let too_old = calendar::years_before(today, MAX_LOOKBACK_YEARS)
                .map_or(true, |earliest| date < earliest);
            if too_old {
                return DateValidation::Rejected(DateRejection::StartTooOld);
            }
        }

        let out_of_order = match boundary {
            Boundary::Start => date >= current.end(),
            Boundary::End => date <= current.start(),
        };
        if out_of_order {
            return DateValidation::Rejected(DateRejection::StartNotBeforeEnd);
        }

        DateValidation::Accepted(date)
    }
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new()
    }
}
