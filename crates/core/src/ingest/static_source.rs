use crate::domain::series::PriceSeries;
use crate::ingest::provider::PriceSource;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Prices held in memory, keyed by upper-cased ticker.
///
/// The JSON form is `{"TICKER": [{"date": "YYYY-MM-DD", "price": 1.0}, ...]}`
/// with dates optional.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, PriceSeries>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.insert(ticker, series);
        self
    }

    pub fn insert(&mut self, ticker: &str, series: PriceSeries) {
        self.series
            .insert(ticker.trim().to_ascii_uppercase(), series);
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: HashMap<String, PriceSeries> =
            serde_json::from_str(s).context("price file is not a ticker -> series map")?;

        let mut out = Self::new();
        for (ticker, series) in raw {
            out.insert(&ticker, series);
        }
        Ok(out)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read price file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid price file {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait::async_trait]
impl PriceSource for StaticPriceSource {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_prices(&self, ticker: &str, lookback: usize) -> Result<PriceSeries> {
        let mut series = self
            .series
            .get(&ticker.trim().to_ascii_uppercase())
            .cloned()
            .with_context(|| format!("no price data for {ticker}"))?;
        series.truncate_front(lookback);
        Ok(series)
    }
}
