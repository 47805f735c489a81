use crate::domain::series::PriceSeries;
use anyhow::Result;

#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Returns up to `lookback` trailing prices for `ticker`, oldest first.
    ///
    /// An empty series is a valid answer; callers treat it as insufficient data.
    async fn fetch_prices(&self, ticker: &str, lookback: usize) -> Result<PriceSeries>;
}
