use crate::errors::CoreError;

/// Persistent collection of watched symbols shared by all clients.
///
/// Implementations store plain uppercase tickers in insertion order.
/// Limits and duplicate checks are enforced by `WatchlistService`.
pub trait SymbolStore: Send {
    fn list(&self) -> Result<Vec<String>, CoreError>;
    fn insert(&mut self, symbol: &str) -> Result<(), CoreError>;
    /// Remove a symbol. Removing an absent symbol is not an error.
    fn remove(&mut self, symbol: &str) -> Result<(), CoreError>;
}

/// In-memory symbol store.
#[derive(Debug, Clone, Default)]
pub struct MemorySymbolStore {
    symbols: Vec<String>,
}

impl MemorySymbolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl SymbolStore for MemorySymbolStore {
    fn list(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.symbols.clone())
    }

    fn insert(&mut self, symbol: &str) -> Result<(), CoreError> {
        self.symbols.push(symbol.to_string());
        Ok(())
    }

    fn remove(&mut self, symbol: &str) -> Result<(), CoreError> {
        self.symbols.retain(|s| s != symbol);
        Ok(())
    }
}
