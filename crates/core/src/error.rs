use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScreenerError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("degenerate normalization range: min ({min}) equals max ({max})")]
    DegenerateRange { min: f64, max: f64 },

    #[error("price fetch failed: {0}")]
    Fetch(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ScreenerError {
    /// Configuration and range errors block a whole run; the rest are per-ticker.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::DegenerateRange { .. })
    }

    /// Classifies an error raised by a price source.
    pub fn from_source(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ScreenerError>() {
            Some(inner) => inner.clone(),
            None => Self::Fetch(format!("{err:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_source_keeps_wrapped_screener_errors() {
        let err = anyhow::Error::new(ScreenerError::InsufficientData("empty".to_string()));
        assert_eq!(
            ScreenerError::from_source(&err),
            ScreenerError::InsufficientData("empty".to_string())
        );
    }

    #[test]
    fn from_source_wraps_other_errors_as_fetch() {
        let err = anyhow::anyhow!("connection reset").context("provider request failed");
        let classified = ScreenerError::from_source(&err);
        assert_eq!(
            classified,
            ScreenerError::Fetch("provider request failed: connection reset".to_string())
        );
        assert!(!classified.is_fatal());
    }

    #[test]
    fn configuration_and_range_errors_are_fatal() {
        assert!(ScreenerError::Configuration("x".to_string()).is_fatal());
        assert!(ScreenerError::DegenerateRange { min: 1.0, max: 1.0 }.is_fatal());
        assert!(!ScreenerError::InsufficientData("x".to_string()).is_fatal());
    }
}
