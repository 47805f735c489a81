use crate::config::Settings;
use crate::domain::series::PriceSeries;
use crate::ingest::provider::PriceSource;
use crate::ingest::types::DailyAdjustedResponse;
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY_ADJUSTED";

// `outputsize=compact` returns roughly the latest 100 trading days.
const COMPACT_OUTPUT_POINTS: usize = 100;

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_alpha_vantage_api_key()?.to_string();
        let base_url = settings
            .alpha_vantage_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("ALPHA_VANTAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(base_url, api_key, Duration::from_secs(timeout_secs))
    }

    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Alpha Vantage http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/query", self.base_url.trim_end_matches('/'))
    }

    fn output_size(lookback: usize) -> &'static str {
        if lookback <= COMPACT_OUTPUT_POINTS {
            "compact"
        } else {
            "full"
        }
    }
}

#[async_trait::async_trait]
impl PriceSource for AlphaVantageClient {
    fn provider_name(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn fetch_prices(&self, ticker: &str, lookback: usize) -> Result<PriceSeries> {
        let res = self
            .http
            .get(self.url())
            .query(&[
                ("function", DAILY_FUNCTION),
                ("symbol", ticker),
                ("outputsize", Self::output_size(lookback)),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Alpha Vantage request failed for {ticker}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Alpha Vantage response")?;
        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("Alpha Vantage response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("Alpha Vantage HTTP {status}: {raw_json}");
        }

        let parsed = serde_json::from_value::<DailyAdjustedResponse>(raw_json)
            .context("failed to parse Alpha Vantage daily series")?;
        let series = parsed
            .into_series(lookback)
            .with_context(|| format!("no usable prices for {ticker}"))?;

        tracing::debug!(
            %ticker,
            points = series.len(),
            last_date = ?series.last_date(),
            "fetched daily prices"
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: String) -> AlphaVantageClient {
        AlphaVantageClient::new(base_url, "demo".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn picks_output_size_from_lookback() {
        assert_eq!(AlphaVantageClient::output_size(63), "compact");
        assert_eq!(AlphaVantageClient::output_size(100), "compact");
        assert_eq!(AlphaVantageClient::output_size(252), "full");
    }

    #[tokio::test]
    async fn fetches_and_parses_daily_series() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("function".into(), DAILY_FUNCTION.into()),
                Matcher::UrlEncoded("symbol".into(), "MSFT".into()),
                Matcher::UrlEncoded("outputsize".into(), "compact".into()),
                Matcher::UrlEncoded("apikey".into(), "demo".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"Time Series (Daily)": {
                    "2026-03-03": {"4. close": "101.0", "5. adjusted close": "101.0"},
                    "2026-03-02": {"4. close": "100.0", "5. adjusted close": "100.0"}
                }}"#,
            )
            .create_async()
            .await;

        let series = client(server.url()).fetch_prices("MSFT", 20).await.unwrap();
        mock.assert_async().await;
        assert_eq!(series.trailing_prices(2).unwrap(), vec![100.0, 101.0]);
    }

    #[tokio::test]
    async fn http_error_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"message": "unavailable"}"#)
            .create_async()
            .await;

        let err = client(server.url()).fetch_prices("SPY", 20).await.unwrap_err();
        assert!(format!("{err:#}").contains("503"));
    }

    #[tokio::test]
    async fn throttled_response_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Information": "API rate limit reached."}"#)
            .create_async()
            .await;

        let err = client(server.url()).fetch_prices("SPY", 20).await.unwrap_err();
        assert!(format!("{err:#}").contains("rate limit"));
    }
}
