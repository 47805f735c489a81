use crate::domain::series::{PricePoint, PriceSeries};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

/// `TIME_SERIES_DAILY_ADJUSTED` payload. Throttling and bad symbols come back
/// as 200 responses carrying one of the message fields instead of data.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyAdjustedResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    pub time_series: Option<BTreeMap<NaiveDate, DailyBar>>,
    #[serde(rename = "Error Message", default)]
    pub error_message: Option<String>,
    #[serde(rename = "Note", default)]
    pub note: Option<String>,
    #[serde(rename = "Information", default)]
    pub information: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. adjusted close", default)]
    pub adjusted_close: Option<String>,
}

impl DailyBar {
    fn price(&self) -> anyhow::Result<f64> {
        let raw = self.adjusted_close.as_deref().unwrap_or(self.close.as_str());
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("invalid price value: {raw:?}"))
    }
}

impl DailyAdjustedResponse {
    pub fn into_series(self, lookback: usize) -> anyhow::Result<PriceSeries> {
        if let Some(msg) = self.error_message {
            anyhow::bail!("provider error: {msg}");
        }

        let Some(time_series) = self.time_series else {
            let msg = self
                .note
                .or(self.information)
                .unwrap_or_else(|| "response has no daily time series".to_string());
            anyhow::bail!("provider returned no data: {msg}");
        };

        let mut points = Vec::with_capacity(time_series.len());
        for (date, bar) in time_series {
            let price = bar.price().with_context(|| format!("bad bar on {date}"))?;
            points.push(PricePoint {
                date: Some(date),
                price,
            });
        }

        let mut series = PriceSeries::new(points)?;
        series.truncate_front(lookback);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_adjusted_close_in_date_order() {
        let v = json!({
            "Meta Data": {"2. Symbol": "SPY"},
            "Time Series (Daily)": {
                "2026-03-04": {"4. close": "12.00", "5. adjusted close": "11.50"},
                "2026-03-02": {"4. close": "10.00", "5. adjusted close": "9.50"},
                "2026-03-03": {"4. close": "11.00", "5. adjusted close": "10.50"}
            }
        });

        let parsed: DailyAdjustedResponse = serde_json::from_value(v).unwrap();
        let series = parsed.into_series(10).unwrap();
        let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![9.5, 10.5, 11.5]);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2026, 3, 4));
    }

    #[test]
    fn keeps_only_trailing_lookback() {
        let v = json!({
            "Time Series (Daily)": {
                "2026-03-02": {"4. close": "1"},
                "2026-03-03": {"4. close": "2"},
                "2026-03-04": {"4. close": "3"}
            }
        });
        let parsed: DailyAdjustedResponse = serde_json::from_value(v).unwrap();
        let series = parsed.into_series(2).unwrap();
        assert_eq!(series.trailing_prices(2).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn rate_limit_note_is_an_error() {
        let v = json!({"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."});
        let parsed: DailyAdjustedResponse = serde_json::from_value(v).unwrap();
        let err = parsed.into_series(5).unwrap_err();
        assert!(format!("{err:#}").contains("call frequency"));
    }

    #[test]
    fn error_message_is_an_error() {
        let v = json!({"Error Message": "Invalid API call."});
        let parsed: DailyAdjustedResponse = serde_json::from_value(v).unwrap();
        assert!(parsed.into_series(5).is_err());
    }

    #[test]
    fn non_numeric_price_is_an_error() {
        let v = json!({"Time Series (Daily)": {"2026-03-02": {"4. close": "n/a"}}});
        let parsed: DailyAdjustedResponse = serde_json::from_value(v).unwrap();
        assert!(parsed.into_series(5).is_err());
    }
}
