use crate::error::ScreenerError;
use serde::Serialize;

/// Raw metrics and composite rating for one ticker under one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub ticker: String,
    /// Percent simple return over the ReturnA window.
    pub return_a: f64,
    /// Percent simple return over the ReturnB window.
    pub return_b: f64,
    /// Annualized volatility, in percent.
    pub volatility: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    /// 1-based overall rank, best rating first.
    pub rank: usize,
    #[serde(flatten)]
    pub record: ScoreRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: ScreenerError,
}
