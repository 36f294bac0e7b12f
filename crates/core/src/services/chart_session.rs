use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::chart::ChartRecord;
use crate::models::date_range::DateRange;
use crate::models::period::Period;
use crate::models::price::PriceSeries;
use crate::storage::session::{self, SessionStore, END_DATE_KEY, PERIOD_KEY, START_DATE_KEY};
use super::chart_service::ChartService;
use super::period_service::PeriodService;
use super::validation_service::{Boundary, DateRejection, DateValidation, DateValidator};

/// What the caller has to do after a date edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEdit {
    /// The edit was refused; `date_error()` holds the message.
    Rejected(DateRejection),
    /// The start moved: fetch history for this period, then `apply_series`.
    Refetch(Period),
    /// The end moved: the chart was rebuilt from the cached series.
    Rebuilt,
}

/// Chart view state for one session: the selected period or custom range,
/// the last fetched history and the assembled chart.
///
/// The last choice is mirrored into the `SessionStore` (a period token, or a
/// start/end pair with an empty period) so it survives a reload.
pub struct ChartSession {
    store: Box<dyn SessionStore>,
    periods: PeriodService,
    validator: DateValidator,
    charts: ChartService,
    current_period: Option<Period>,
    range: DateRange,
    date_error: Option<String>,
    symbols: Vec<String>,
    series: PriceSeries,
    chart: Vec<ChartRecord>,
}

impl ChartSession {
    /// Restore state from the session store.
    ///
    /// 1. a stored period → resolved against `today`
    /// 2. otherwise a stored start/end pair → used as a custom range
    /// 3. otherwise `default_period`
    ///
    /// Unparseable stored values are ignored.
    pub fn restore(
        store: Box<dyn SessionStore>,
        today: NaiveDate,
        default_period: Period,
    ) -> Result<Self, CoreError> {
        let periods = PeriodService::new();

        let stored_period = session::get_non_empty(store.as_ref(), PERIOD_KEY).and_then(|token| {
            token
                .parse::<Period>()
                .map_err(|e| tracing::warn!(error = %e, "ignoring stored period"))
                .ok()
        });

        let stored_range = match (
            session::get_non_empty(store.as_ref(), START_DATE_KEY),
            session::get_non_empty(store.as_ref(), END_DATE_KEY),
        ) {
            (Some(start), Some(end)) => DateRange::parse(&start, &end)
                .map_err(|e| tracing::warn!(error = %e, "ignoring stored date range"))
                .ok(),
            _ => None,
        };

        let (current_period, range) = match (stored_period, stored_range) {
            (Some(period), _) => (Some(period), periods.resolve(period, today)?),
            (None, Some(range)) => (None, range),
            (None, None) => (Some(default_period), periods.resolve(default_period, today)?),
        };

        tracing::debug!(period = ?current_period, ?range, "chart session restored");

        Ok(Self {
            store,
            periods,
            validator: DateValidator::new(),
            charts: ChartService::new(),
            current_period,
            range,
            date_error: None,
            symbols: Vec::new(),
            series: PriceSeries::new(),
            chart: Vec::new(),
        })
    }

    /// Period buttons offered to the user, in display order.
    pub fn available_periods(&self) -> &'static [Period] {
        &Period::BUTTONS
    }

    /// Selected period; `None` while a custom range is shown.
    pub fn current_period(&self) -> Option<Period> {
        self.current_period
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Message of the last rejected date edit, cleared by the next accepted one.
    pub fn date_error(&self) -> Option<&str> {
        self.date_error.as_deref()
    }

    pub fn chart(&self) -> &[ChartRecord] {
        &self.chart
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// Period to request from the market-data API: the selected one, or the
    /// smallest standard period covering a custom start date.
    pub fn fetch_period(&self, today: NaiveDate) -> Period {
        self.current_period
            .unwrap_or_else(|| self.periods.classify(self.range.start(), today))
    }

    /// Switch to a relative period. Returns the period to fetch.
    pub fn select_period(&mut self, period: Period, today: NaiveDate) -> Result<Period, CoreError> {
        self.range = self.periods.resolve(period, today)?;
        self.current_period = Some(period);
        self.date_error = None;

        self.store.set(PERIOD_KEY, period.token());
        self.store.set(START_DATE_KEY, "");
        self.store.set(END_DATE_KEY, "");

        Ok(period)
    }

    /// Apply a user edit of the start or end date.
    pub fn edit_date(
        &mut self,
        boundary: Boundary,
        value: &str,
        today: NaiveDate,
    ) -> Result<DateEdit, CoreError> {
        let date = match self.validator.validate(boundary, value, &self.range, today) {
            DateValidation::Accepted(date) => date,
            DateValidation::Rejected(reason) => {
                self.date_error = Some(reason.to_string());
                return Ok(DateEdit::Rejected(reason));
            }
        };
        self.date_error = None;
        self.current_period = None;

        let edit = match boundary {
            Boundary::Start => {
                self.range = DateRange::new(date, self.range.end())?;
                DateEdit::Refetch(self.periods.classify(date, today))
            }
            Boundary::End => {
                self.range = DateRange::new(self.range.start(), date)?;
                self.rebuild();
                DateEdit::Rebuilt
            }
        };

        let (start, end) = self.range.to_iso_pair();
        self.store.set(START_DATE_KEY, &start);
        self.store.set(END_DATE_KEY, &end);
        self.store.set(PERIOD_KEY, "");

        Ok(edit)
    }

    /// Store freshly fetched history and rebuild the chart for the current range.
    pub fn apply_series(&mut self, symbols: &[String], series: PriceSeries) {
        self.symbols = symbols.to_vec();
        self.series = series;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.chart = self.charts.assemble(
            &self.symbols,
            &self.series,
            self.range.start(),
            self.range.end(),
        );
    }
}
