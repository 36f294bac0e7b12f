use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use crate::errors::CoreError;
use crate::models::period::Period;
use crate::models::price::{PricePoint, PriceSeries, QuotePrices};
use crate::models::symbol::SymbolInfo;
use crate::services::period_service::PeriodService;
use super::history::collect_history;
use super::traits::MarketDataProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance provider, used as a fallback behind the batch API.
///
/// - **Free**: No API key required.
/// - **Per symbol**: one request per symbol, no batch endpoint.
/// - **No directory**: `list_symbols` returns an empty list.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
    periods: PeriodService,
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER.into(),
        message,
    }
}

/// Midnight UTC at the start of `date`, as the connector expects.
fn midnight_utc(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or_else(|| CoreError::InvalidDate(date.to_string()))?;
    let day = u8::try_from(date.day()).map_err(|_| CoreError::InvalidDate(date.to_string()))?;

    time::Date::from_calendar_date(date.year(), month, day)
        .map(|d| d.midnight().assume_utc())
        .map_err(|e| api_error(format!("{date} is not representable: {e}")))
}

/// Trading day of a quote's unix timestamp.
fn trading_day(timestamp: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| api_error(format!("connector setup failed: {e}")))?;
        Ok(Self {
            connector,
            periods: PeriodService::new(),
        })
    }

    /// Daily closes for one symbol over `[from, to]`.
    async fn closes_between(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        // The history endpoint treats the end as exclusive
        let (start, end) = (midnight_utc(from)?, midnight_utc(to + chrono::Duration::days(1))?);

        let history = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .and_then(|resp| resp.quotes())
            .map_err(|e| api_error(format!("history for {symbol} unavailable: {e}")))?;

        Ok(history
            .into_iter()
            .filter_map(|q| trading_day(q.timestamp).map(|day| PricePoint::new(day, q.close)))
            .collect())
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn list_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError> {
        Ok(Vec::new())
    }

    async fn get_quotes(&self, symbols: &[String]) -> Result<QuotePrices, CoreError> {
        let mut prices = QuotePrices::with_capacity(symbols.len());

        for symbol in symbols {
            let quote = self
                .connector
                .get_latest_quotes(symbol, "1d")
                .await
                .and_then(|resp| resp.last_quote());

            match quote {
                Ok(quote) => {
                    prices.insert(symbol.clone(), quote.close);
                }
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, "Yahoo Finance has no quote for symbol");
                }
            }
        }

        Ok(prices)
    }

    async fn get_history(
        &self,
        symbols: &[String],
        period: Period,
        today: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        let range = self.periods.resolve(period, today)?;
        let (from, to) = (range.start(), range.end());

        collect_history(PROVIDER, symbols, |symbol| async move {
            self.closes_between(&symbol, from, to).await
        })
        .await
    }
}
