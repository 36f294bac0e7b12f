pub mod calendar;
pub mod clock;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use clock::Clock;
use models::{
    chart::ChartRecord,
    period::Period,
    price::{PriceSeries, QuotePrices},
    settings::Settings,
    symbol::{SymbolInfo, WatchlistRow},
};
use services::{
    chart_session::{ChartSession, DateEdit},
    market_data_service::MarketDataService,
    validation_service::Boundary,
    watchlist_service::{self, WatchlistService},
};
use storage::{session::SessionStore, symbols::SymbolStore};
use tokio::sync::broadcast;

use errors::CoreError;

/// Main entry point for the Stock Watchlist core library.
///
/// Ties together the shared watchlist, latest quote prices and the chart
/// session. Network calls go through `MarketDataService`; "today" always comes
/// from the injected `Clock`.
#[must_use]
pub struct StockWatchlist {
    settings: Settings,
    market_data: MarketDataService,
    watchlist: WatchlistService,
    session: ChartSession,
    clock: Box<dyn Clock>,
    directory: Vec<SymbolInfo>,
    prices: QuotePrices,
}

impl std::fmt::Debug for StockWatchlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockWatchlist")
            .field("providers", &self.market_data.provider_names())
            .field("directory", &self.directory.len())
            .field("prices", &self.prices.len())
            .field("period", &self.session.current_period())
            .field("range", &self.session.range())
            .field("chart_records", &self.session.chart().len())
            .finish()
    }
}

impl StockWatchlist {
    /// Build the facade and restore the chart period/range from `session_store`.
    pub fn new(
        settings: Settings,
        market_data: MarketDataService,
        symbol_store: Box<dyn SymbolStore>,
        session_store: Box<dyn SessionStore>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let session = ChartSession::restore(session_store, clock.today(), settings.default_period)?;
        let watchlist = WatchlistService::new(symbol_store, settings.max_symbols);

        Ok(Self {
            settings,
            market_data,
            watchlist,
            session,
            clock,
            directory: Vec::new(),
            prices: QuotePrices::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Symbol directory ────────────────────────────────────────────

    /// Fetch the symbol directory used for add-validation and company names.
    /// Returns the number of known symbols.
    pub async fn load_directory(&mut self) -> Result<usize, CoreError> {
        self.directory = self.market_data.list_symbols().await?;
        tracing::info!(count = self.directory.len(), "symbol directory loaded");
        Ok(self.directory.len())
    }

    #[must_use]
    pub fn directory(&self) -> &[SymbolInfo] {
        &self.directory
    }

    // ── Watchlist ───────────────────────────────────────────────────

    pub fn symbols(&self) -> Result<Vec<String>, CoreError> {
        self.watchlist.symbols()
    }

    /// Add a symbol to the shared list. Call `refresh_prices` and
    /// `refresh_chart` afterwards to pick up its data.
    pub fn add_symbol(&mut self, code: &str) -> Result<Vec<String>, CoreError> {
        self.watchlist.add(code, &self.directory)
    }

    /// Remove a symbol from the shared list and drop its cached quote.
    pub fn remove_symbol(&mut self, code: &str) -> Result<Vec<String>, CoreError> {
        let symbols = self.watchlist.remove(code)?;
        self.prices.retain(|symbol, _| symbols.contains(symbol));
        Ok(symbols)
    }

    /// Symbol lists broadcast after every add/remove.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<String>> {
        self.watchlist.subscribe()
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Fetch latest prices for every watched symbol. The host application
    /// calls this every `Settings::price_refresh_interval()`.
    pub async fn refresh_prices(&mut self) -> Result<&QuotePrices, CoreError> {
        let symbols = self.watchlist.symbols()?;
        self.prices = if symbols.is_empty() {
            QuotePrices::new()
        } else {
            self.market_data.get_quotes(&symbols).await?
        };
        Ok(&self.prices)
    }

    #[must_use]
    pub fn prices(&self) -> &QuotePrices {
        &self.prices
    }

    /// Price list rows in watchlist order.
    pub fn rows(&self) -> Result<Vec<WatchlistRow>, CoreError> {
        Ok(self
            .watchlist
            .symbols()?
            .into_iter()
            .map(|symbol| WatchlistRow {
                name: watchlist_service::display_name(&self.directory, &symbol),
                price: self.prices.get(&symbol).copied(),
                symbol,
            })
            .collect())
    }

    // ── Chart ───────────────────────────────────────────────────────

    /// Re-fetch history for the watched symbols and rebuild the chart.
    /// On failure the previous chart is kept.
    pub async fn refresh_chart(&mut self) -> Result<&[ChartRecord], CoreError> {
        let symbols = self.watchlist.symbols()?;
        if symbols.is_empty() {
            self.session.apply_series(&symbols, PriceSeries::new());
            return Ok(self.session.chart());
        }

        let today = self.clock.today();
        let period = self.session.fetch_period(today);
        let series = self.market_data.get_history(&symbols, period, today).await?;
        self.session.apply_series(&symbols, series);
        Ok(self.session.chart())
    }

    /// Switch the chart to a relative period and reload it. As with
    /// `edit_date`, the period stays selected when the fetch fails.
    pub async fn select_period(&mut self, period: Period) -> Result<&[ChartRecord], CoreError> {
        let today = self.clock.today();
        self.session.select_period(period, today)?;
        self.refresh_chart().await
    }

    /// Apply a user edit of the "start"/"from" or "end"/"to" date field.
    ///
    /// A new start triggers a fetch; a new end rebuilds from cached history.
    /// Rejections are returned as `DateEdit::Rejected` with the message in
    /// `session().date_error()`.
    ///
    /// An accepted edit is committed to the session and its store before the
    /// fetch. If that fetch fails the error is returned, `session().range()`
    /// already reports the new range, and `chart()` still holds the previous
    /// records until the next successful `refresh_chart`.
    pub async fn edit_date(&mut self, boundary: &str, value: &str) -> Result<DateEdit, CoreError> {
        let boundary: Boundary = boundary.parse()?;
        let today = self.clock.today();
        let edit = self.session.edit_date(boundary, value, today)?;
        if let DateEdit::Refetch(_) = edit {
            self.refresh_chart().await?;
        }
        Ok(edit)
    }

    #[must_use]
    pub fn chart(&self) -> &[ChartRecord] {
        self.session.chart()
    }

    #[must_use]
    pub fn session(&self) -> &ChartSession {
        &self.session
    }
}
