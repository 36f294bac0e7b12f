pub mod chart_service;
pub mod chart_session;
pub mod market_data_service;
pub mod period_service;
pub mod validation_service;
pub mod watchlist_service;
