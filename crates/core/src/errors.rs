use thiserror::Error;

/// Unified error type for the entire stock-watchlist-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// A rejected date edit is NOT an error: see `DateValidation`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Periods / Dates ─────────────────────────────────────────────
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("No market data provider available")]
    NoProvider,

    // ── Watchlist ───────────────────────────────────────────────────
    #[error("'{0}' is already displayed")]
    DuplicateSymbol(String),

    #[error("Unknown or incorrect code")]
    UnknownSymbol(String),

    #[error("Watchlist is full ({0} symbols)")]
    SymbolLimitReached(usize),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string (symbol lists, tokens).
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
