use crate::error::ScreenerError;

/// Trading periods per year used to annualize per-period volatility.
pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

fn ensure_usable(prices: &[f64], metric: &str) -> Result<(), ScreenerError> {
    if prices.len() < 2 {
        return Err(ScreenerError::InsufficientData(format!(
            "{metric} needs at least 2 prices (got {})",
            prices.len()
        )));
    }
    if let Some(bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(ScreenerError::InsufficientData(format!(
            "{metric} requires positive prices (found {bad})"
        )));
    }
    Ok(())
}

fn ensure_finite(value: f64, metric: &str) -> Result<f64, ScreenerError> {
    if !value.is_finite() {
        return Err(ScreenerError::InsufficientData(format!(
            "{metric} is not representable for this price range (got {value})"
        )));
    }
    Ok(value)
}

/// Percent simple return from the first to the last price.
pub fn simple_return(prices: &[f64]) -> Result<f64, ScreenerError> {
    ensure_usable(prices, "return")?;
    let first = prices[0];
    let last = prices[prices.len() - 1];
    ensure_finite((last - first) / first * 100.0, "return")
}

/// Single-period simple returns `(p[i] - p[i-1]) / p[i-1]`.
pub fn period_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// Annualized sample standard deviation of simple returns, in percent.
///
/// Two prices give a single return, whose sample deviation is taken as zero.
pub fn annualized_volatility(prices: &[f64]) -> Result<f64, ScreenerError> {
    ensure_usable(prices, "volatility")?;
    let returns = period_returns(prices);
    ensure_finite(
        sample_std_dev(&returns) * TRADING_PERIODS_PER_YEAR.sqrt() * 100.0,
        "volatility",
    )
}
