use serde::{Deserialize, Serialize};

use super::period::Period;
use crate::errors::CoreError;

/// Default base URL of the IEX-style batch market-data API.
pub const DEFAULT_MARKET_DATA_URL: &str = "https://api.iextrading.com/1.0";

/// Application settings. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL for the batch market-data REST API.
    pub market_data_base_url: String,

    /// Period shown when nothing was restored from session storage.
    pub default_period: Period,

    /// Maximum number of symbols in the shared watchlist.
    pub max_symbols: usize,

    /// How often the host application should call `refresh_prices()`.
    pub price_refresh_secs: u64,

    /// HTTP request timeout for market-data calls.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            market_data_base_url: DEFAULT_MARKET_DATA_URL.to_string(),
            default_period: Period::ThreeMonths,
            max_symbols: 100,
            price_refresh_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.market_data_base_url.trim().is_empty() {
            return Err(CoreError::Config("market_data_base_url must not be empty".into()));
        }
        if self.max_symbols == 0 {
            return Err(CoreError::Config("max_symbols must be at least 1".into()));
        }
        if self.price_refresh_secs == 0 {
            return Err(CoreError::Config("price_refresh_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn price_refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.price_refresh_secs)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
