//! PriceSeries: the canonical close-price history every stage consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Close price for a single symbol on a single trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Violations of the `PriceSeries` invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("date {date} at index {index} does not follow the previous date")]
    Unordered { index: usize, date: NaiveDate },

    #[error("close {close} on {date} is not a positive finite price")]
    InvalidClose { date: NaiveDate, close: f64 },
}

/// Chronological close prices for one symbol.
///
/// Invariants (checked in [`PriceSeries::new`]):
/// - at least one point
/// - strictly increasing dates, so no duplicates
/// - every close is finite and > 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        if points.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (i, p) in points.iter().enumerate() {
            if !p.close.is_finite() || p.close <= 0.0 {
                return Err(SeriesError::InvalidClose {
                    date: p.date,
                    close: p.close,
                });
            }
            if i > 0 && p.date <= points[i - 1].date {
                return Err(SeriesError::Unordered {
                    index: i,
                    date: p.date,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn close(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|p| p.close)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// Most recent point. Never fails since the series is non-empty.
    pub fn latest(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }
}
