use crate::error::ScreenerError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const TRADING_DAYS_PER_MONTH: usize = 21;

/// Period labels offered by the screener form.
///
/// `"1 day"` still parses but is not offered: a window of N uses the trailing
/// N prices, so a one-price window can never produce a return.
pub const PERIOD_LABELS: [&str; 7] = [
    "5 days",
    "10 days",
    "20 days",
    "3 months",
    "6 months",
    "12 months",
    "24 months",
];

const DEFAULT_TICKERS: &str = "AAPL, MSFT, SPY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookbackPeriod {
    Days(u32),
    Months(u32),
}

impl LookbackPeriod {
    pub fn trading_days(self) -> usize {
        match self {
            Self::Days(n) => n as usize,
            Self::Months(n) => n as usize * TRADING_DAYS_PER_MONTH,
        }
    }
}

impl FromStr for LookbackPeriod {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScreenerError::Configuration(format!("invalid period label: {s:?}"));

        let lower = s.trim().to_ascii_lowercase();
        let mut parts = lower.split_whitespace();
        let (Some(count), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let n = count.parse::<u32>().map_err(|_| invalid())?;
        if n == 0 {
            return Err(invalid());
        }

        match unit {
            "day" | "days" => Ok(Self::Days(n)),
            "month" | "months" => Ok(Self::Months(n)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(1) => write!(f, "1 day"),
            Self::Days(n) => write!(f, "{n} days"),
            Self::Months(1) => write!(f, "1 month"),
            Self::Months(n) => write!(f, "{n} months"),
        }
    }
}

/// Metric weights as fractions. The engine accepts any non-negative sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub return_a: f64,
    pub return_b: f64,
    pub volatility: f64,
}

impl Weights {
    /// Converts form percentages, which must add up to exactly 100.
    pub fn from_percentages(
        return_a: u32,
        return_b: u32,
        volatility: u32,
    ) -> Result<Self, ScreenerError> {
        for (name, pct) in [
            ("return_a", return_a),
            ("return_b", return_b),
            ("volatility", volatility),
        ] {
            if pct > 100 {
                return Err(ScreenerError::Configuration(format!(
                    "{name} weight must be between 0 and 100 (got {pct})"
                )));
            }
        }

        let total = return_a + return_b + volatility;
        if total != 100 {
            return Err(ScreenerError::Configuration(format!(
                "weights must sum to 100% (got {total}%)"
            )));
        }

        Ok(Self {
            return_a: f64::from(return_a) / 100.0,
            return_b: f64::from(return_b) / 100.0,
            volatility: f64::from(volatility) / 100.0,
        })
    }

    fn validate(&self) -> Result<(), ScreenerError> {
        for (name, w) in [
            ("return_a", self.return_a),
            ("return_b", self.return_b),
            ("volatility", self.volatility),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ScreenerError::Configuration(format!(
                    "{name} weight must be a non-negative number (got {w})"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationBounds {
    pub min: f64,
    pub max: f64,
}

impl NormalizationBounds {
    pub const RETURNS: Self = Self {
        min: -50.0,
        max: 100.0,
    };
    pub const VOLATILITY: Self = Self {
        min: 0.0,
        max: 100.0,
    };

    fn validate(&self, name: &str) -> Result<(), ScreenerError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ScreenerError::Configuration(format!(
                "{name} bounds must be finite (got {}..{})",
                self.min, self.max
            )));
        }
        if self.min == self.max {
            return Err(ScreenerError::DegenerateRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringParameters {
    pub return_a_window: usize,
    pub return_b_window: usize,
    pub volatility_window: usize,
    pub weights: Weights,
    pub return_bounds: NormalizationBounds,
    pub volatility_bounds: NormalizationBounds,
}

impl ScoringParameters {
    pub fn new(
        return_a_window: usize,
        return_b_window: usize,
        volatility_window: usize,
        weights: Weights,
    ) -> Self {
        Self {
            return_a_window,
            return_b_window,
            volatility_window,
            weights,
            return_bounds: NormalizationBounds::RETURNS,
            volatility_bounds: NormalizationBounds::VOLATILITY,
        }
    }

    /// Checks run-wide preconditions. Fails before any price is fetched.
    pub fn validate(&self) -> Result<(), ScreenerError> {
        for (name, window) in [
            ("return_a", self.return_a_window),
            ("return_b", self.return_b_window),
            ("volatility", self.volatility_window),
        ] {
            if window == 0 {
                return Err(ScreenerError::Configuration(format!(
                    "{name} window must be at least one period"
                )));
            }
        }
        self.weights.validate()?;
        self.return_bounds.validate("return")?;
        self.volatility_bounds.validate("volatility")?;
        Ok(())
    }

    /// Number of trailing prices needed to evaluate every metric.
    pub fn max_window(&self) -> usize {
        self.return_a_window
            .max(self.return_b_window)
            .max(self.volatility_window)
    }
}

impl Default for ScoringParameters {
    fn default() -> Self {
        Self::new(
            LookbackPeriod::Months(3).trading_days(),
            LookbackPeriod::Days(20).trading_days(),
            LookbackPeriod::Days(20).trading_days(),
            Weights {
                return_a: 0.4,
                return_b: 0.3,
                volatility: 0.3,
            },
        )
    }
}

/// A validated screening run: which tickers, scored how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRequest {
    pub tickers: Vec<String>,
    pub params: ScoringParameters,
}

/// Raw parameters as a user enters them: free-text tickers, period labels,
/// integer percentage weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenForm {
    pub tickers: String,
    pub return_a_period: String,
    pub return_a_weight: u32,
    pub return_b_period: String,
    pub return_b_weight: u32,
    pub volatility_period: String,
    pub volatility_weight: u32,
}

impl Default for ScreenForm {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.to_string(),
            return_a_period: "3 months".to_string(),
            return_a_weight: 40,
            return_b_period: "20 days".to_string(),
            return_b_weight: 30,
            volatility_period: "20 days".to_string(),
            volatility_weight: 30,
        }
    }
}

impl ScreenForm {
    pub fn to_request(&self) -> Result<ScreenRequest, ScreenerError> {
        let tickers = parse_tickers(&self.tickers);
        if tickers.is_empty() {
            return Err(ScreenerError::Configuration(
                "at least one ticker is required".to_string(),
            ));
        }

        let weights = Weights::from_percentages(
            self.return_a_weight,
            self.return_b_weight,
            self.volatility_weight,
        )?;

        let params = ScoringParameters::new(
            self.return_a_period.parse::<LookbackPeriod>()?.trading_days(),
            self.return_b_period.parse::<LookbackPeriod>()?.trading_days(),
            self.volatility_period.parse::<LookbackPeriod>()?.trading_days(),
            weights,
        );
        params.validate()?;

        Ok(ScreenRequest { tickers, params })
    }
}

/// Splits comma-separated tickers, upper-cased, first occurrence wins.
pub fn parse_tickers(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(|t| t.trim().to_ascii_uppercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offered_period_labels() {
        let days: Vec<usize> = PERIOD_LABELS
            .iter()
            .map(|l| l.parse::<LookbackPeriod>().unwrap().trading_days())
            .collect();
        assert_eq!(days, vec![5, 10, 20, 63, 126, 252, 504]);
    }

    #[test]
    fn one_day_parses_but_is_not_offered() {
        let period: LookbackPeriod = "1 day".parse().unwrap();
        assert_eq!(period.trading_days(), 1);
        assert!(!PERIOD_LABELS.contains(&"1 day"));
        assert!(PERIOD_LABELS
            .iter()
            .all(|l| l.parse::<LookbackPeriod>().unwrap().trading_days() >= 2));
    }

    #[test]
    fn period_label_round_trips_through_display() {
        for label in PERIOD_LABELS {
            let period: LookbackPeriod = label.parse().unwrap();
            assert_eq!(period.to_string(), label);
        }
    }

    #[test]
    fn rejects_bad_period_labels() {
        for label in ["", "3", "0 days", "3 weeks", "three months", "3 months ago"] {
            assert!(
                matches!(
                    label.parse::<LookbackPeriod>(),
                    Err(ScreenerError::Configuration(_))
                ),
                "{label:?} should be rejected"
            );
        }
    }

    #[test]
    fn weights_must_sum_to_one_hundred() {
        let err = Weights::from_percentages(40, 30, 20).unwrap_err();
        assert_eq!(
            err,
            ScreenerError::Configuration("weights must sum to 100% (got 90%)".to_string())
        );

        let w = Weights::from_percentages(40, 30, 30).unwrap();
        assert!((w.return_a - 0.4).abs() < 1e-12);
        assert!((w.volatility - 0.3).abs() < 1e-12);
    }

    #[test]
    fn weights_above_one_hundred_are_rejected() {
        assert!(Weights::from_percentages(150, 0, 0).is_err());
    }

    #[test]
    fn engine_accepts_weights_not_summing_to_one() {
        let params = ScoringParameters::new(
            5,
            5,
            5,
            Weights {
                return_a: 2.0,
                return_b: 0.0,
                volatility: 0.5,
            },
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn negative_weight_is_a_configuration_error() {
        let mut params = ScoringParameters::default();
        params.weights.return_b = -0.1;
        assert!(matches!(
            params.validate(),
            Err(ScreenerError::Configuration(_))
        ));
    }

    #[test]
    fn collapsed_bounds_are_degenerate() {
        let mut params = ScoringParameters::default();
        params.volatility_bounds = NormalizationBounds { min: 5.0, max: 5.0 };
        assert_eq!(
            params.validate(),
            Err(ScreenerError::DegenerateRange { min: 5.0, max: 5.0 })
        );
    }

    #[test]
    fn parse_tickers_trims_dedupes_and_uppercases() {
        assert_eq!(
            parse_tickers(" aapl, MSFT,,spy , AAPL "),
            vec!["AAPL", "MSFT", "SPY"]
        );
    }

    #[test]
    fn default_form_builds_default_parameters() {
        let req = ScreenForm::default().to_request().unwrap();
        assert_eq!(req.tickers, vec!["AAPL", "MSFT", "SPY"]);
        assert_eq!(req.params, ScoringParameters::default());
        assert_eq!(req.params.max_window(), 63);
    }

    #[test]
    fn form_without_tickers_is_rejected() {
        let form = ScreenForm {
            tickers: " , ".to_string(),
            ..ScreenForm::default()
        };
        assert!(matches!(
            form.to_request(),
            Err(ScreenerError::Configuration(_))
        ));
    }

    #[test]
    fn form_deserializes_with_partial_fields() {
        let form: ScreenForm =
            serde_json::from_str(r#"{"tickers": "QQQ", "return_a_period": "6 months"}"#).unwrap();
        let req = form.to_request().unwrap();
        assert_eq!(req.tickers, vec!["QQQ"]);
        assert_eq!(req.params.return_a_window, 126);
        assert_eq!(req.params.return_b_window, 20);
    }
}
