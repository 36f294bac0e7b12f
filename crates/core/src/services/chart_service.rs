use chrono::NaiveDate;

use crate::calendar;
use crate::models::chart::ChartRecord;
use crate::models::price::PriceSeries;

/// Generates chart-ready records from sparse per-symbol price history.
///
/// Pure: no I/O, and the date range is always passed in.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build one record per weekday in `[from, to]`, ascending, and attach
    /// each symbol's close where its series has a point on exactly that day.
    ///
    /// - Points outside the range or on weekends are dropped.
    /// - A day without a point leaves the symbol absent on that record.
    /// - A symbol with no entry in `series` contributes nothing.
    /// - `from > to` yields no records.
    pub fn assemble(
        &self,
        symbols: &[String],
        series: &PriceSeries,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<ChartRecord> {
        let mut records = Vec::new();
        let mut current_date = from;

        while current_date <= to {
            if calendar::is_weekday(current_date) {
                records.push(ChartRecord::new(
                    current_date,
                    calendar::format_label(current_date),
                ));
            }

            current_date = match current_date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        for symbol in symbols {
            let Some(points) = series.get(symbol) else {
                tracing::debug!(%symbol, "no price series for symbol, leaving chart fields empty");
                continue;
            };

            // Records are sorted by date, so each point is a binary search (O(log n)).
            for point in points {
                if let Ok(idx) = records.binary_search_by_key(&point.date, |r| r.date) {
                    records[idx].closes.insert(symbol.clone(), point.close);
                }
            }
        }

        records
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
