pub mod metrics;
pub mod normalize;
pub mod rating;

use crate::domain::params::ScoringParameters;
use crate::domain::record::{RankedRecord, ScoreRecord, TickerFailure};
use crate::domain::series::PriceSeries;
use crate::error::ScreenerError;
use serde::Serialize;

use self::metrics::{annualized_volatility, simple_return};
use self::normalize::{normalize_inverted, normalize_within};
use self::rating::{composite_rating, NormalizedMetrics};

/// Scores one ticker. Pure: no I/O, no state.
pub fn score_series(
    ticker: &str,
    series: &PriceSeries,
    params: &ScoringParameters,
) -> Result<ScoreRecord, ScreenerError> {
    let needed = params.max_window();
    if series.len() < needed {
        return Err(ScreenerError::InsufficientData(format!(
            "{ticker}: {} prices available, {needed} required",
            series.len()
        )));
    }

    let return_a = simple_return(&series.trailing_prices(params.return_a_window)?)?;
    let return_b = simple_return(&series.trailing_prices(params.return_b_window)?)?;
    let volatility = annualized_volatility(&series.trailing_prices(params.volatility_window)?)?;

    let normalized = NormalizedMetrics {
        return_a: normalize_within(return_a, params.return_bounds)?,
        return_b: normalize_within(return_b, params.return_bounds)?,
        volatility: normalize_inverted(volatility, params.volatility_bounds)?,
    };

    let rating = composite_rating(&normalized, &params.weights);
    if !rating.is_finite() {
        return Err(ScreenerError::InsufficientData(format!(
            "{ticker}: rating is not a finite number"
        )));
    }

    Ok(ScoreRecord {
        ticker: ticker.to_string(),
        return_a,
        return_b,
        volatility,
        rating,
    })
}

/// Stable sort by rating, best first. Ties keep their input order.
pub fn rank_records(mut records: Vec<ScoreRecord>) -> Vec<RankedRecord> {
    records.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| RankedRecord {
            rank: idx + 1,
            record,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreenTable {
    pub records: Vec<RankedRecord>,
    pub failures: Vec<TickerFailure>,
}

/// Scores already-fetched rows. A failing row is recorded and skipped.
pub fn score_table<I>(rows: I, params: &ScoringParameters) -> ScreenTable
where
    I: IntoIterator<Item = (String, Result<PriceSeries, ScreenerError>)>,
{
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for (ticker, fetched) in rows {
        match fetched.and_then(|series| score_series(&ticker, &series, params)) {
            Ok(record) => {
                tracing::debug!(
                    ticker = %record.ticker,
                    rating = record.rating,
                    "scored ticker"
                );
                records.push(record);
            }
            Err(error) => {
                tracing::warn!(%ticker, error = %error, "skipping ticker");
                failures.push(TickerFailure { ticker, error });
            }
        }
    }

    ScreenTable {
        records: rank_records(records),
        failures,
    }
}
