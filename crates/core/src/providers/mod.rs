pub mod history;
pub mod traits;

// Market-data provider implementations
pub mod iex;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
