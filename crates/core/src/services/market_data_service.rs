use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::period::Period;
use crate::models::price::{PriceSeries, QuotePrices};
use crate::models::settings::Settings;
use crate::models::symbol::SymbolInfo;
use crate::providers::iex::IexProvider;
use crate::providers::traits::MarketDataProvider;

/// Fetches market data from a prioritized list of providers.
///
/// Providers are tried in registration order. If the primary fails (API down,
/// rate limited, etc.), the next one is tried; the last error is returned when
/// every provider fails.
pub struct MarketDataService {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl MarketDataService {
    /// Create a service with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Batch API first, Yahoo Finance as fallback (native only).
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut service = Self::new();

        service.register(Box::new(IexProvider::from_settings(settings)));

        #[cfg(not(target_arch = "wasm32"))]
        {
            match crate::providers::yahoo_finance::YahooFinanceProvider::new() {
                Ok(yahoo) => service.register(Box::new(yahoo)),
                Err(e) => tracing::warn!(error = %e, "Yahoo Finance fallback unavailable"),
            }
        }

        service
    }

    /// Register a provider with the lowest priority so far.
    pub fn register(&mut self, provider: Box<dyn MarketDataProvider>) {
        self.providers.push(provider);
    }

    /// Names of all registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Symbol directory from the first provider that has a non-empty one.
    pub async fn list_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError> {
        if self.providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &self.providers {
            match provider.list_symbols().await {
                Ok(symbols) if !symbols.is_empty() => return Ok(symbols),
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "symbol directory fetch failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    /// Latest prices for `symbols`.
    ///
    /// Prices that are not finite or are negative are dropped.
    pub async fn get_quotes(&self, symbols: &[String]) -> Result<QuotePrices, CoreError> {
        if self.providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &self.providers {
            match provider.get_quotes(symbols).await {
                Ok(mut prices) => {
                    prices.retain(|symbol, price| {
                        let valid = price.is_finite() && *price >= 0.0;
                        if !valid {
                            tracing::warn!(provider = provider.name(), %symbol, %price, "dropping invalid quote");
                        }
                        valid
                    });
                    return Ok(prices);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "quote fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Daily price history for `symbols` over `period` ending `today`.
    pub async fn get_history(
        &self,
        symbols: &[String],
        period: Period,
        today: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        if self.providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &self.providers {
            match provider.get_history(symbols, period, today).await {
                Ok(series) => {
                    tracing::debug!(provider = provider.name(), %period, symbols = series.len(), "fetched price history");
                    return Ok(series);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "history fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }
}

impl Default for MarketDataService {
    fn default() -> Self {
        Self::new()
    }
}
