//! Fixed-percentage stop-loss / take-profit levels.
//!
//! Levels are placed at fixed offsets from a single reference price:
//! stop = price * (1 - stop_loss_pct), target = price * (1 + take_profit_pct).
//! Evaluated as `price -/+ price * pct`: at price 100 with 5% / 10% the
//! levels are exactly 95 and 110.
//! No history or signal state is involved.

use crate::error::ParamError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STOP_LOSS_PCT: f64 = 0.05;
pub const DEFAULT_TAKE_PROFIT_PCT: f64 = 0.10;

/// Stop-loss and take-profit thresholds for a hypothetical long position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Validated percentage offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPercentLevels {
    stop_loss_pct: f64,
    take_profit_pct: f64,
}

impl FixedPercentLevels {
    /// `stop_loss_pct` must lie in [0, 1]; `take_profit_pct` must be >= 0.
    ///
    /// # Example
    /// ```
    /// use momentum_core::risk::FixedPercentLevels;
    ///
    /// let levels = FixedPercentLevels::new(0.05, 0.10).unwrap().levels(100.0).unwrap();
    /// assert_eq!(levels.stop_loss, 95.0);
    /// assert_eq!(levels.take_profit, 110.0);
    /// ```
    pub fn new(stop_loss_pct: f64, take_profit_pct: f64) -> Result<Self, ParamError> {
        if !stop_loss_pct.is_finite() || !(0.0..=1.0).contains(&stop_loss_pct) {
            return Err(ParamError::invalid(format!(
                "stop_loss_pct must be in [0, 1], got {stop_loss_pct}"
            )));
        }
        if !take_profit_pct.is_finite() || take_profit_pct < 0.0 {
            return Err(ParamError::invalid(format!(
                "take_profit_pct must be >= 0, got {take_profit_pct}"
            )));
        }
        Ok(Self {
            stop_loss_pct,
            take_profit_pct,
        })
    }

    pub fn stop_loss_pct(&self) -> f64 {
        self.stop_loss_pct
    }

    pub fn take_profit_pct(&self) -> f64 {
        self.take_profit_pct
    }

    /// Levels around `price`, which must be a positive finite number.
    pub fn levels(&self, price: f64) -> Result<RiskLevels, ParamError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ParamError::invalid(format!(
                "price must be > 0, got {price}"
            )));
        }
        Ok(RiskLevels {
            stop_loss: price - price * self.stop_loss_pct,
            take_profit: price + price * self.take_profit_pct,
        })
    }
}

impl Default for FixedPercentLevels {
    fn default() -> Self {
        Self {
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            take_profit_pct: DEFAULT_TAKE_PROFIT_PCT,
        }
    }
}

/// Compute levels in one call.
pub fn risk_levels(
    price: f64,
    stop_loss_pct: f64,
    take_profit_pct: f64,
) -> Result<RiskLevels, ParamError> {
    FixedPercentLevels::new(stop_loss_pct, take_profit_pct)?.levels(price)
}
