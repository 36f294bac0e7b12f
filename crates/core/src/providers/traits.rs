use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::period::Period;
use crate::models::price::{PriceSeries, QuotePrices};
use crate::models::symbol::SymbolInfo;

/// Trait abstraction for market-data sources.
///
/// Each API (IEX-style batch endpoint, Yahoo Finance) implements this trait;
/// `MarketDataService` tries them in order.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Directory of tradable symbols. Providers without a directory return
    /// an empty list, which disables the "unknown code" check.
    async fn list_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError>;

    /// Latest price for each requested symbol. Symbols the provider does not
    /// know are omitted from the result.
    async fn get_quotes(&self, symbols: &[String]) -> Result<QuotePrices, CoreError>;

    /// Daily closing prices covering `period` ending `today`.
    ///
    /// The result may contain points outside that range and may be missing
    /// symbols entirely; the chart assembler absorbs both.
    async fn get_history(
        &self,
        symbols: &[String],
        period: Period,
        today: NaiveDate,
    ) -> Result<PriceSeries, CoreError>;
}
