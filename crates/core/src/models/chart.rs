use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One weekday row of the aligned chart series.
///
/// Serializes flat, the shape line-chart libraries expect:
/// `{"date": "2018-06-01", "label": "Fri, 01 Jun 2018", "FB": 101.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Trading day (never a Saturday or Sunday)
    pub date: NaiveDate,

    /// Axis/tooltip label, e.g. `"Tue, 05 Jun 2018"`
    pub label: String,

    /// Closing price per symbol. A symbol with no data for this day is absent,
    /// which is different from a 0.0 close.
    #[serde(flatten)]
    pub closes: BTreeMap<String, f64>,
}

impl ChartRecord {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
            closes: BTreeMap::new(),
        }
    }

    /// Closing price for `symbol`, `None` when the series had no point on this day.
    pub fn close(&self, symbol: &str) -> Option<f64> {
        self.closes.get(symbol).copied()
    }

    pub fn has_data(&self, symbol: &str) -> bool {
        self.closes.contains_key(symbol)
    }
}
