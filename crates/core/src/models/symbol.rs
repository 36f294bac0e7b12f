use serde::{Deserialize, Serialize};

/// An entry of the market-data symbol directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub symbol: String,

    /// Company name (e.g., "Apple Inc."); may be empty
    #[serde(default)]
    pub name: String,
}

impl SymbolInfo {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
        }
    }
}

/// Normalize user input into a ticker code.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// One row of the price list: ticker, company name and latest price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistRow {
    pub symbol: String,
    pub name: String,
    /// `None` until a quote for the symbol has been fetched
    pub price: Option<f64>,
}
