use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single closing price on a trading day.
///
/// Unknown fields in provider payloads (open, high, volume, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Per-symbol price history as returned by a market-data provider.
///
/// Series are sparse: not necessarily daily, contiguous, aligned across
/// symbols, or limited to the requested range.
pub type PriceSeries = HashMap<String, Vec<PricePoint>>;

/// Latest quote price per symbol.
pub type QuotePrices = HashMap<String, f64>;
