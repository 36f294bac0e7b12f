use tokio::sync::broadcast;

use crate::errors::CoreError;
use crate::models::symbol::{normalize_symbol, SymbolInfo};
use crate::storage::symbols::SymbolStore;

/// Capacity of the symbol-list broadcast channel. Slow subscribers that fall
/// further behind than this only see the latest lists.
const BROADCAST_CAPACITY: usize = 16;

/// Maintains the shared list of watched symbols.
///
/// Every successful change is persisted to the `SymbolStore` and the full new
/// list is broadcast to all subscribers, so every client renders the same list.
pub struct WatchlistService {
    store: Box<dyn SymbolStore>,
    max_symbols: usize,
    updates: broadcast::Sender<Vec<String>>,
}

impl WatchlistService {
    pub fn new(store: Box<dyn SymbolStore>, max_symbols: usize) -> Self {
        let (updates, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            store,
            max_symbols,
            updates,
        }
    }

    /// Receive every symbol list produced by `add` / `remove`.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<String>> {
        self.updates.subscribe()
    }

    /// Current watched symbols, in insertion order.
    pub fn symbols(&self) -> Result<Vec<String>, CoreError> {
        self.store.list()
    }

    pub fn is_full(&self) -> Result<bool, CoreError> {
        Ok(self.store.list()?.len() >= self.max_symbols)
    }

    /// Add a symbol and return the new list.
    ///
    /// The code is trimmed and uppercased. When `directory` is non-empty the
    /// code must appear in it; an empty directory skips that check.
    pub fn add(&mut self, code: &str, directory: &[SymbolInfo]) -> Result<Vec<String>, CoreError> {
        let symbol = normalize_symbol(code);
        if symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }

        let current = self.store.list()?;
        if current.len() >= self.max_symbols {
            return Err(CoreError::SymbolLimitReached(self.max_symbols));
        }
        if current.contains(&symbol) {
            return Err(CoreError::DuplicateSymbol(symbol));
        }
        if !directory.is_empty() && find_symbol(directory, &symbol).is_none() {
            return Err(CoreError::UnknownSymbol(symbol));
        }

        self.store.insert(&symbol)?;
        tracing::info!(%symbol, "symbol added to watchlist");
        self.publish()
    }

    /// Remove a symbol (case-insensitive) and return the new list.
    /// Removing a symbol that is not watched leaves the list unchanged.
    pub fn remove(&mut self, code: &str) -> Result<Vec<String>, CoreError> {
        let symbol = normalize_symbol(code);
        self.store.remove(&symbol)?;
        tracing::info!(%symbol, "symbol removed from watchlist");
        self.publish()
    }

    fn publish(&self) -> Result<Vec<String>, CoreError> {
        let symbols = self.store.list()?;
        // No subscribers is fine
        let _ = self.updates.send(symbols.clone());
        Ok(symbols)
    }
}

/// Look a symbol up in the market-data directory.
pub fn find_symbol<'a>(directory: &'a [SymbolInfo], symbol: &str) -> Option<&'a SymbolInfo> {
    directory.iter().find(|s| s.symbol == symbol)
}

/// Company name for display next to the ticker, empty when unknown.
pub fn display_name(directory: &[SymbolInfo], symbol: &str) -> String {
    find_symbol(directory, symbol)
        .map(|s| s.name.clone())
        .unwrap_or_default()
}
