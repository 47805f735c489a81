use crate::error::ScreenerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub price: f64,
}

/// Chronologically ascending prices for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from points, rejecting dates that are not strictly ascending.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ScreenerError> {
        let mut last: Option<NaiveDate> = None;
        for point in &points {
            if let Some(date) = point.date {
                if let Some(prev) = last {
                    if date <= prev {
                        return Err(ScreenerError::Fetch(format!(
                            "price series is not in ascending date order ({prev} then {date})"
                        )));
                    }
                }
                last = Some(date);
            }
        }
        Ok(Self { points })
    }

    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        Self {
            points: prices
                .into_iter()
                .map(|price| PricePoint { date: None, price })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.iter().rev().find_map(|p| p.date)
    }

    /// Prices of the trailing `window` points.
    pub fn trailing_prices(&self, window: usize) -> Result<Vec<f64>, ScreenerError> {
        if self.points.len() < window {
            return Err(ScreenerError::InsufficientData(format!(
                "window of {window} periods needs {window} prices, series has {}",
                self.points.len()
            )));
        }
        Ok(self.points[self.points.len() - window..]
            .iter()
            .map(|p| p.price)
            .collect())
    }

    /// Keeps only the trailing `window` points.
    pub fn truncate_front(&mut self, window: usize) {
        if self.points.len() > window {
            self.points.drain(..self.points.len() - window);
        }
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = ScreenerError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let points = vec![
            PricePoint { date: Some(day(3)), price: 1.0 },
            PricePoint { date: Some(day(2)), price: 1.0 },
        ];
        assert!(matches!(PriceSeries::new(points), Err(ScreenerError::Fetch(_))));
    }

    #[test]
    fn trailing_prices_takes_the_tail() {
        let series = PriceSeries::from_prices([100.0, 102.0, 101.0, 105.0, 104.0]);
        assert_eq!(
            series.trailing_prices(4).unwrap(),
            vec![102.0, 101.0, 105.0, 104.0]
        );
    }

    #[test]
    fn trailing_prices_fails_when_series_is_short() {
        let series = PriceSeries::from_prices([1.0, 2.0]);
        assert!(matches!(
            series.trailing_prices(3),
            Err(ScreenerError::InsufficientData(_))
        ));
    }

    #[test]
    fn truncate_front_keeps_latest_points() {
        let mut series = PriceSeries::from_prices([1.0, 2.0, 3.0, 4.0]);
        series.truncate_front(2);
        assert_eq!(series.trailing_prices(2).unwrap(), vec![3.0, 4.0]);
        series.truncate_front(10);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn deserializes_points_with_optional_dates() {
        let series: PriceSeries = serde_json::from_str(
            r#"[{"date": "2026-03-02", "price": 10.0}, {"price": 11.0}, {"date": "2026-03-04", "price": 12.0}]"#,
        )
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_date(), Some(day(4)));
    }
}
