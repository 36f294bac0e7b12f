use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::calendar;
use crate::errors::CoreError;
use crate::models::period::Period;
use crate::models::price::{PricePoint, PriceSeries, QuotePrices};
use crate::models::settings::Settings;
use crate::models::symbol::SymbolInfo;
use super::traits::MarketDataProvider;

const PROVIDER: &str = "IEX";

/// IEX-style batch market-data provider.
///
/// - **Free**: No API key required.
/// - **Batch**: one request covers every watched symbol.
/// - **Endpoints**:
///   - `GET {base}/ref-data/symbols`: symbol directory
///   - `GET {base}/stock/market/batch?types=price&symbols=A,B`: latest prices
///   - `GET {base}/stock/market/batch?types=chart&range=3m&symbols=A,B`: daily history
pub struct IexProvider {
    client: Client,
    base_url: String,
}

impl IexProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, std::time::Duration::from_secs(30))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_timeout(&settings.market_data_base_url, settings.request_timeout())
    }

    #[allow(unused_variables)]
    fn with_timeout(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(timeout);
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the batch endpoint for `types` (`"price"` or `"chart"`).
    pub fn batch_url(&self, types: &str, symbols: &[String], period: Option<Period>) -> String {
        let mut url = format!(
            "{}/stock/market/batch?types={types}&symbols={}",
            self.base_url,
            symbols.join(",")
        );
        if let Some(period) = period {
            url.push_str(&format!("&range={period}"));
        }
        url
    }

    async fn get_text(&self, url: &str) -> Result<String, CoreError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

// ── IEX API response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct QuoteEntry {
    price: Option<f64>,
}

#[derive(Deserialize)]
struct ChartEntry {
    #[serde(default)]
    chart: Vec<RawChartPoint>,
}

#[derive(Deserialize)]
struct RawChartPoint {
    date: String,
    close: Option<f64>,
}

/// Parse a `types=price` batch response: `{"FB": {"price": 190.1}, ...}`.
pub fn parse_price_batch(body: &str) -> Result<QuotePrices, CoreError> {
    let raw: HashMap<String, QuoteEntry> = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse price batch: {e}"),
    })?;

    Ok(raw
        .into_iter()
        .filter_map(|(symbol, entry)| entry.price.map(|price| (symbol, price)))
        .collect())
}

/// Parse a `types=chart` batch response:
/// `{"FB": {"chart": [{"date": "2018-06-01", "close": 101.0, ...}]}, ...}`.
///
/// Points with an unparseable date or no close are skipped.
pub fn parse_chart_batch(body: &str) -> Result<PriceSeries, CoreError> {
    let raw: HashMap<String, ChartEntry> = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse chart batch: {e}"),
    })?;

    let mut series = PriceSeries::with_capacity(raw.len());
    for (symbol, entry) in raw {
        let points: Vec<PricePoint> = entry
            .chart
            .into_iter()
            .filter_map(|p| match (calendar::parse_iso(&p.date), p.close) {
                (Ok(date), Some(close)) => Some(PricePoint::new(date, close)),
                _ => {
                    tracing::debug!(%symbol, date = %p.date, "skipping chart point without date or close");
                    None
                }
            })
            .collect();
        series.insert(symbol, points);
    }
    Ok(series)
}

/// Parse the symbol directory: `[{"symbol": "A", "name": "Agilent"}, ...]`.
pub fn parse_symbol_directory(body: &str) -> Result<Vec<SymbolInfo>, CoreError> {
    let raw: Vec<SymbolInfo> = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse symbol directory: {e}"),
    })?;
    Ok(raw
        .into_iter()
        .map(|s| SymbolInfo::new(s.symbol, s.name))
        .collect())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for IexProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn list_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError> {
        let url = format!("{}/ref-data/symbols", self.base_url);
        let body = self.get_text(&url).await?;
        parse_symbol_directory(&body)
    }

    async fn get_quotes(&self, symbols: &[String]) -> Result<QuotePrices, CoreError> {
        if symbols.is_empty() {
            return Ok(QuotePrices::new());
        }
        let body = self.get_text(&self.batch_url("price", symbols, None)).await?;
        parse_price_batch(&body)
    }

    async fn get_history(
        &self,
        symbols: &[String],
        period: Period,
        _today: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        if symbols.is_empty() {
            return Ok(PriceSeries::new());
        }
        let body = self
            .get_text(&self.batch_url("chart", symbols, Some(period)))
            .await?;
        parse_chart_batch(&body)
    }
}
