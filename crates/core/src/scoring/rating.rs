use crate::domain::params::Weights;
use serde::Serialize;

/// Metrics already rescaled onto the normalized scale. Volatility is inverted,
/// so every component is "higher is better".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedMetrics {
    pub return_a: f64,
    pub return_b: f64,
    pub volatility: f64,
}

/// Weighted sum of the normalized metrics. Unbounded; only meaningful for ranking.
pub fn composite_rating(metrics: &NormalizedMetrics, weights: &Weights) -> f64 {
    metrics.return_a * weights.return_a
        + metrics.return_b * weights.return_b
        + metrics.volatility * weights.volatility
}
