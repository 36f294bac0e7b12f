// ═══════════════════════════════════════════════════════════════════
// Integration Tests — StockWatchlist facade end to end with a mock
// market-data provider, in-memory stores and a fixed clock.
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use stock_watchlist_core::clock::FixedClock;
use stock_watchlist_core::errors::CoreError;
use stock_watchlist_core::models::period::Period;
use stock_watchlist_core::models::price::{PricePoint, PriceSeries, QuotePrices};
use stock_watchlist_core::models::settings::Settings;
use stock_watchlist_core::models::symbol::{SymbolInfo, WatchlistRow};
use stock_watchlist_core::providers::traits::MarketDataProvider;
use stock_watchlist_core::services::chart_session::DateEdit;
use stock_watchlist_core::services::market_data_service::MarketDataService;
use stock_watchlist_core::services::validation_service::DateRejection;
use stock_watchlist_core::storage::session::{SessionStore, PERIOD_KEY, START_DATE_KEY};
use stock_watchlist_core::storage::symbols::MemorySymbolStore;
use stock_watchlist_core::StockWatchlist;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Tuesday
fn today() -> NaiveDate {
    d(2018, 6, 5)
}

// ═══════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
struct SharedSessionStore(Arc<Mutex<HashMap<String, String>>>);

impl SessionStore for SharedSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.lock().unwrap().insert(key.to_string(), value.to_string());
    }
}

/// Serves a fixed FB/AAPL/MSFT dataset and records every history request.
#[derive(Clone, Default)]
struct RecordingProvider {
    requests: Arc<Mutex<Vec<(Vec<String>, Period)>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingProvider {
    fn failing() -> Self {
        let provider = Self::default();
        provider.set_failing(true);
        provider
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn requests(&self) -> Vec<(Vec<String>, Period)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for RecordingProvider {
    fn name(&self) -> &str {
        "Recording"
    }

    async fn list_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError> {
        Ok(vec![
            SymbolInfo::new("FB", "Facebook Inc."),
            SymbolInfo::new("AAPL", "Apple Inc."),
            SymbolInfo::new("MSFT", "Microsoft Corporation"),
        ])
    }

    async fn get_quotes(&self, symbols: &[String]) -> Result<QuotePrices, CoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Network("down".into()));
        }
        let known = [("FB", 190.0), ("AAPL", 185.0)];
        Ok(known
            .iter()
            .filter(|(s, _)| symbols.iter().any(|x| x == s))
            .map(|(s, p)| (s.to_string(), *p))
            .collect())
    }

    async fn get_history(
        &self,
        symbols: &[String],
        period: Period,
        _today: NaiveDate,
    ) -> Result<PriceSeries, CoreError> {
        self.requests.lock().unwrap().push((symbols.to_vec(), period));
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Network("down".into()));
        }

        let mut series = PriceSeries::new();
        for symbol in symbols {
            let base = match symbol.as_str() {
                "FB" => 100.0,
                "AAPL" => 200.0,
                _ => continue,
            };
            let points = (1..=5)
                .map(|day| PricePoint::new(d(2018, 6, day), base + day as f64))
                .filter(|p| !(symbol == "AAPL" && p.date == d(2018, 6, 5)))
                .collect();
            series.insert(symbol.clone(), points);
        }
        Ok(series)
    }
}

fn build(
    provider: RecordingProvider,
    symbols: &[&str],
    session: SharedSessionStore,
) -> StockWatchlist {
    let mut market_data = MarketDataService::new();
    market_data.register(Box::new(provider));
    StockWatchlist::new(
        Settings::default(),
        market_data,
        Box::new(MemorySymbolStore::with_symbols(symbols.iter().copied())),
        Box::new(session),
        Box::new(FixedClock(today())),
    )
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Chart flow
// ═══════════════════════════════════════════════════════════════════

mod chart_flow {
    use super::*;

    #[tokio::test]
    async fn initial_chart_uses_default_period() {
        let provider = RecordingProvider::default();
        let mut app = build(provider.clone(), &["FB", "AAPL"], SharedSessionStore::default());

        let chart = app.refresh_chart().await.unwrap();
        assert_eq!(chart.first().unwrap().date, d(2018, 3, 5));
        assert_eq!(chart.last().unwrap().date, today());

        assert_eq!(
            provider.requests(),
            vec![(vec!["FB".to_string(), "AAPL".to_string()], Period::ThreeMonths)]
        );
    }

    #[tokio::test]
    async fn select_period_refetches_and_realigns() {
        let provider = RecordingProvider::default();
        let session = SharedSessionStore::default();
        let mut app = build(provider.clone(), &["FB", "AAPL"], session.clone());

        let chart = app.select_period(Period::OneMonth).await.unwrap().to_vec();
        assert_eq!(chart.first().unwrap().date, d(2018, 5, 7)); // 05-05 is a Saturday
        let last = chart.last().unwrap();
        assert_eq!(last.label, "Tue, 05 Jun 2018");
        assert_eq!(last.close("FB"), Some(105.0));
        assert_eq!(last.close("AAPL"), None);

        assert_eq!(app.session().current_period(), Some(Period::OneMonth));
        assert_eq!(session.get(PERIOD_KEY).as_deref(), Some("1m"));
        assert_eq!(provider.requests().last().unwrap().1, Period::OneMonth);
    }

    #[tokio::test]
    async fn start_edit_refetches_with_classified_period() {
        let provider = RecordingProvider::default();
        let session = SharedSessionStore::default();
        let mut app = build(provider.clone(), &["FB", "AAPL"], session.clone());
        app.refresh_chart().await.unwrap();

        let edit = app.edit_date("from", "2018-06-01").await.unwrap();
        assert_eq!(edit, DateEdit::Refetch(Period::OneMonth));
        assert_eq!(provider.requests().len(), 2);
        assert_eq!(provider.requests()[1].1, Period::OneMonth);

        let dates: Vec<NaiveDate> = app.chart().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2018, 6, 1), d(2018, 6, 4), d(2018, 6, 5)]);
        assert_eq!(app.session().current_period(), None);
        assert_eq!(session.get(START_DATE_KEY).as_deref(), Some("2018-06-01"));
    }

    #[tokio::test]
    async fn end_edit_rebuilds_without_fetching() {
        let provider = RecordingProvider::default();
        let mut app = build(provider.clone(), &["FB", "AAPL"], SharedSessionStore::default());
        app.refresh_chart().await.unwrap();

        let edit = app.edit_date("to", "2018-06-04").await.unwrap();
        assert_eq!(edit, DateEdit::Rebuilt);
        assert_eq!(provider.requests().len(), 1);
        assert_eq!(app.chart().last().unwrap().date, d(2018, 6, 4));
        assert_eq!(app.chart().last().unwrap().close("AAPL"), Some(204.0));
    }

    #[tokio::test]
    async fn rejected_edit_reports_message() {
        let provider = RecordingProvider::default();
        let mut app = build(provider.clone(), &["FB"], SharedSessionStore::default());

        let edit = app.edit_date("to", "2018-06-06").await.unwrap();
        assert_eq!(edit, DateEdit::Rejected(DateRejection::EndAfterToday));
        assert_eq!(
            app.session().date_error(),
            Some("End date must not be after today's date")
        );
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_boundary_is_an_error() {
        let mut app = build(RecordingProvider::default(), &["FB"], SharedSessionStore::default());
        assert!(matches!(
            app.edit_date("middle", "2018-06-01").await,
            Err(CoreError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn reload_restores_last_choice() {
        let session = SharedSessionStore::default();
        let mut app = build(RecordingProvider::default(), &["FB"], session.clone());
        app.select_period(Period::OneYear).await.unwrap();

        let reloaded = build(RecordingProvider::default(), &["FB"], session.clone());
        assert_eq!(reloaded.session().current_period(), Some(Period::OneYear));

        let mut app = reloaded;
        app.edit_date("from", "2018-01-10").await.unwrap();

        let reloaded = build(RecordingProvider::default(), &["FB"], session);
        assert_eq!(reloaded.session().current_period(), None);
        assert_eq!(reloaded.session().range().start(), d(2018, 1, 10));
        assert_eq!(reloaded.session().fetch_period(today()), Period::SixMonths);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_chart() {
        let provider = RecordingProvider::default();
        let mut app = build(provider.clone(), &["FB"], SharedSessionStore::default());
        let before = app.refresh_chart().await.unwrap().to_vec();

        provider.set_failing(true);
        assert!(matches!(
            app.select_period(Period::OneYear).await,
            Err(CoreError::Network(_))
        ));
        assert_eq!(app.chart(), before.as_slice());
        assert_eq!(app.session().current_period(), Some(Period::OneYear));

        provider.set_failing(false);
        let after = app.refresh_chart().await.unwrap();
        assert_eq!(after.first().unwrap().date, d(2017, 6, 5));
    }

    #[tokio::test]
    async fn failed_refetch_after_start_edit_commits_range() {
        let provider = RecordingProvider::default();
        let session = SharedSessionStore::default();
        let mut app = build(provider.clone(), &["FB"], session.clone());
        let before = app.refresh_chart().await.unwrap().to_vec();

        provider.set_failing(true);
        assert!(matches!(
            app.edit_date("from", "2018-06-01").await,
            Err(CoreError::Network(_))
        ));
        assert_eq!(app.session().range().start(), d(2018, 6, 1));
        assert_eq!(session.get(START_DATE_KEY).as_deref(), Some("2018-06-01"));
        assert_eq!(app.chart(), before.as_slice());

        provider.set_failing(false);
        let dates: Vec<NaiveDate> = app.refresh_chart().await.unwrap().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2018, 6, 1), d(2018, 6, 4), d(2018, 6, 5)]);
    }

    #[tokio::test]
    async fn empty_watchlist_renders_dates_only() {
        let provider = RecordingProvider::default();
        let mut app = build(provider.clone(), &[], SharedSessionStore::default());
        let chart = app.refresh_chart().await.unwrap();
        assert!(!chart.is_empty());
        assert!(chart.iter().all(|r| r.closes.is_empty()));
        assert!(provider.requests().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Watchlist + prices
// ═══════════════════════════════════════════════════════════════════

mod watchlist_flow {
    use super::*;

    #[tokio::test]
    async fn add_validates_against_directory() {
        let mut app = build(RecordingProvider::default(), &["FB", "AAPL"], SharedSessionStore::default());
        assert_eq!(app.load_directory().await.unwrap(), 3);

        assert_eq!(
            app.add_symbol("msft").unwrap(),
            vec!["FB".to_string(), "AAPL".to_string(), "MSFT".to_string()]
        );
        assert!(matches!(app.add_symbol("ZZZZ"), Err(CoreError::UnknownSymbol(_))));
        assert!(matches!(app.add_symbol("fb"), Err(CoreError::DuplicateSymbol(_))));
    }

    #[tokio::test]
    async fn rows_combine_names_and_prices() {
        let mut app = build(RecordingProvider::default(), &["FB", "MSFT"], SharedSessionStore::default());
        app.load_directory().await.unwrap();
        app.refresh_prices().await.unwrap();

        assert_eq!(
            app.rows().unwrap(),
            vec![
                WatchlistRow {
                    symbol: "FB".into(),
                    name: "Facebook Inc.".into(),
                    price: Some(190.0),
                },
                WatchlistRow {
                    symbol: "MSFT".into(),
                    name: "Microsoft Corporation".into(),
                    price: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn remove_drops_cached_price_and_broadcasts() {
        let mut app = build(RecordingProvider::default(), &["FB", "AAPL"], SharedSessionStore::default());
        let mut rx = app.subscribe();
        app.refresh_prices().await.unwrap();
        assert_eq!(app.prices().len(), 2);

        app.remove_symbol("aapl").unwrap();
        assert_eq!(app.symbols().unwrap(), vec!["FB".to_string()]);
        assert!(!app.prices().contains_key("AAPL"));
        assert_eq!(rx.try_recv().unwrap(), vec!["FB".to_string()]);
    }

    #[tokio::test]
    async fn price_refresh_failure_is_returned() {
        let mut app = build(RecordingProvider::failing(), &["FB"], SharedSessionStore::default());
        assert!(app.refresh_prices().await.is_err());
    }

    #[tokio::test]
    async fn empty_watchlist_has_no_prices() {
        let mut app = build(RecordingProvider::default(), &[], SharedSessionStore::default());
        assert!(app.refresh_prices().await.unwrap().is_empty());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings {
            max_symbols: 0,
            ..Settings::default()
        };
        let result = StockWatchlist::new(
            settings,
            MarketDataService::new(),
            Box::new(MemorySymbolStore::new()),
            Box::new(SharedSessionStore::default()),
            Box::new(FixedClock(today())),
        );
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
