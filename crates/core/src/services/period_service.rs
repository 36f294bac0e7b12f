use chrono::NaiveDate;

use crate::calendar;
use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::period::{Period, Span};

/// Converts between relative periods ("3m", "ytd") and absolute date ranges.
///
/// `today` is always passed in; nothing here reads the system clock.
pub struct PeriodService;

impl PeriodService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a period to `[start, today]`.
    ///
    /// Month and year steps carry across year boundaries and clamp the day to
    /// the end of the target month, so `1y` from 2016-02-29 starts on 2015-02-28.
    pub fn resolve(&self, period: Period, today: NaiveDate) -> Result<DateRange, CoreError> {
        let start = self.period_start(period, today)?;
        DateRange::new(start, today)
    }

    /// Resolve a raw period token; unknown tokens fail with `InvalidPeriod`.
    pub fn resolve_token(&self, token: &str, today: NaiveDate) -> Result<DateRange, CoreError> {
        let period: Period = token.parse()?;
        self.resolve(period, today)
    }

    /// First day covered by `period` when it ends on `today`.
    pub fn period_start(&self, period: Period, today: NaiveDate) -> Result<NaiveDate, CoreError> {
        match period.span() {
            None => Ok(calendar::start_of_year(today)),
            Some(Span::Months(n)) => calendar::months_before(today, n),
            Some(Span::Years(n)) => calendar::years_before(today, n),
        }
    }

    /// Infer the standard period matching an arbitrary start date.
    ///
    /// Returns the shortest fixed period whose start is on or before `start`,
    /// so `classify(resolve(p).start) == p` for every fixed period. Starts older
    /// than five years classify as `5y`, starts within the last month as `1m`.
    /// `ytd` is never returned.
    pub fn classify(&self, start: NaiveDate, today: NaiveDate) -> Period {
        let mut chosen = Period::FiveYears;

        for period in Period::FIXED_DESCENDING {
            let covers = self
                .period_start(period, today)
                .is_ok_and(|boundary| boundary <= start);
            if !covers {
                break;
            }
            chosen = period;
        }

        chosen
    }
}

impl Default for PeriodService {
    fn default() -> Self {
        Self::new()
    }
}
