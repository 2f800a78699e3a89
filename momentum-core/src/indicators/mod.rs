//! Indicator trait and implementations.
//!
//! Indicators are pure functions: price history in, series of the same
//! length out. Warmup entries are `None`, never a numeric placeholder.

pub mod momentum;

pub use momentum::{momentum, Momentum, MomentumSeries};

use crate::domain::PriceSeries;

/// Trait for indicators over a close-price series.
///
/// # Look-ahead contamination guard
/// No value at index t may depend on a close at t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "momentum_20").
    fn name(&self) -> &str;

    /// Number of leading entries that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns exactly `series.len()` entries.
    fn compute(&self, series: &PriceSeries) -> Vec<Option<f64>>;
}

/// Build a price series from closes on consecutive days, for tests.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> PriceSeries {
    use crate::domain::PricePoint;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(base_date + chrono::Duration::days(i as i64), close))
        .collect();
    PriceSeries::new("TEST", points).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-12;
