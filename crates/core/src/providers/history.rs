use std::future::Future;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};

/// Fetch history one symbol at a time for providers without a batch endpoint.
///
/// A symbol whose request fails is logged and left out of the series, so one
/// bad ticker does not blank the whole chart. Only when every symbol fails is
/// the last error returned, letting `MarketDataService` try the next provider.
pub async fn collect_history<F, Fut>(
    provider: &str,
    symbols: &[String],
    mut fetch: F,
) -> Result<PriceSeries, CoreError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<PricePoint>, CoreError>>,
{
    let mut series = PriceSeries::with_capacity(symbols.len());
    let mut last_error = None;

    for symbol in symbols {
        match fetch(symbol.clone()).await {
            Ok(points) => {
                series.insert(symbol.clone(), points);
            }
            Err(e) => {
                tracing::warn!(provider, %symbol, error = %e, "skipping symbol without history");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if series.is_empty() => Err(e),
        _ => Ok(series),
    }
}
