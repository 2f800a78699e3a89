//! Momentum: rolling percentage change over a lookback window.
//!
//! momentum[t] = close[t] / close[t-window] - 1
//! Lookback: window. Entries before the window are `None`.

use super::Indicator;
use crate::domain::PriceSeries;
use crate::error::ParamError;

/// Momentum values aligned index-for-index with the source `PriceSeries`.
pub type MomentumSeries = Vec<Option<f64>>;

#[derive(Debug, Clone)]
pub struct Momentum {
    window: usize,
    name: String,
}

impl Momentum {
    /// Window is signed so callers can pass user input straight through;
    /// anything below 1 is rejected.
    pub fn new(window: i64) -> Result<Self, ParamError> {
        let window = usize::try_from(window)
            .ok()
            .filter(|w| *w >= 1)
            .ok_or_else(|| ParamError::invalid(format!("window must be > 0, got {window}")))?;

        Ok(Self {
            window,
            name: format!("momentum_{window}"),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, series: &PriceSeries) -> Vec<Option<f64>> {
        let closes: Vec<f64> = series.closes().collect();
        let n = closes.len();
        let mut result = vec![None; n];

        for i in self.window..n {
            result[i] = Some(closes[i] / closes[i - self.window] - 1.0);
        }

        result
    }
}

/// Compute momentum for `series` over `window` periods.
pub fn momentum(series: &PriceSeries, window: i64) -> Result<MomentumSeries, ParamError> {
    Ok(Momentum::new(window)?.compute(series))
}
