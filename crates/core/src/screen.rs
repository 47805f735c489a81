use crate::domain::params::{ScoringParameters, ScreenRequest};
use crate::domain::record::{RankedRecord, TickerFailure};
use crate::domain::series::PriceSeries;
use crate::error::ScreenerError;
use crate::ingest::provider::PriceSource;
use crate::scoring::score_table;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ScreenOptions {
    /// Deadline for a single ticker's fetch.
    pub fetch_timeout: Duration,
    /// Tickers fetched at once. Results keep input order regardless.
    pub concurrency: usize,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub params: ScoringParameters,
    pub records: Vec<RankedRecord>,
    pub failures: Vec<TickerFailure>,
}

/// Fetches and scores every requested ticker.
///
/// Only invalid parameters fail the whole run. Fetch and data problems are
/// reported per ticker in [`ScreenReport::failures`].
pub async fn run_screen(
    source: &dyn PriceSource,
    request: &ScreenRequest,
    options: &ScreenOptions,
) -> Result<ScreenReport, ScreenerError> {
    request.params.validate()?;

    let run_id = Uuid::new_v4();
    let lookback = request.params.max_window();
    let provider = source.provider_name();

    tracing::info!(
        %run_id,
        provider,
        tickers = request.tickers.len(),
        lookback,
        "screen run started"
    );

    let rows: Vec<(String, Result<PriceSeries, ScreenerError>)> =
        stream::iter(request.tickers.iter().cloned())
            .map(|ticker| async move {
                let fetched = fetch_one(source, &ticker, lookback, options.fetch_timeout).await;
                (ticker, fetched)
            })
            .buffered(options.concurrency.max(1))
            .collect()
            .await;

    let table = score_table(rows, &request.params);

    tracing::info!(
        %run_id,
        records = table.records.len(),
        failures = table.failures.len(),
        "screen run finished"
    );

    Ok(ScreenReport {
        run_id,
        generated_at: Utc::now(),
        provider: provider.to_string(),
        params: request.params.clone(),
        records: table.records,
        failures: table.failures,
    })
}

async fn fetch_one(
    source: &dyn PriceSource,
    ticker: &str,
    lookback: usize,
    timeout: Duration,
) -> Result<PriceSeries, ScreenerError> {
    match tokio::time::timeout(timeout, source.fetch_prices(ticker, lookback)).await {
        Ok(Ok(series)) if series.is_empty() => Err(ScreenerError::InsufficientData(format!(
            "{ticker}: provider returned no prices"
        ))),
        Ok(Ok(series)) => Ok(series),
        Ok(Err(err)) => Err(ScreenerError::from_source(&err)),
        Err(_) => Err(ScreenerError::Fetch(format!(
            "{ticker}: timed out after {timeout:?}"
        ))),
    }
}
