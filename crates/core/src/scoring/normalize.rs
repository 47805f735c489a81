use crate::domain::params::NormalizationBounds;
use crate::error::ScreenerError;

/// Upper end of the normalized scale; `normalize(max, min, max) == NORMALIZED_SCALE`.
pub const NORMALIZED_SCALE: f64 = 100.0;

/// Linear rescale of `value` from `[min, max]` onto `[0, NORMALIZED_SCALE]`. Not clamped.
pub fn normalize(value: f64, min: f64, max: f64) -> Result<f64, ScreenerError> {
    if max == min {
        return Err(ScreenerError::DegenerateRange { min, max });
    }
    Ok((value - min) / (max - min) * NORMALIZED_SCALE)
}

pub fn normalize_within(value: f64, bounds: NormalizationBounds) -> Result<f64, ScreenerError> {
    normalize(value, bounds.min, bounds.max)
}

/// Like [`normalize_within`] but higher inputs map to lower outputs.
pub fn normalize_inverted(value: f64, bounds: NormalizationBounds) -> Result<f64, ScreenerError> {
    Ok(NORMALIZED_SCALE - normalize_within(value, bounds)?)
}
