//! Strategy configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) gives
//! the standard setup: one year of history, a 20-period window, 5% stop,
//! 10% target, last five rows shown.
//!
//! ```toml
//! period = "6mo"
//! window = 10
//! stop_loss_pct = 0.03
//! take_profit_pct = 0.08
//! tail_rows = 10
//! ```

use crate::domain::Period;
use crate::error::ParamError;
use crate::indicators::Momentum;
use crate::risk::{FixedPercentLevels, DEFAULT_STOP_LOSS_PCT, DEFAULT_TAKE_PROFIT_PCT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WINDOW: i64 = 20;
pub const DEFAULT_TAIL_ROWS: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Pipeline parameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    pub period: Period,
    pub window: i64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub tail_rows: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            period: Period::default(),
            window: DEFAULT_WINDOW,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            take_profit_pct: DEFAULT_TAKE_PROFIT_PCT,
            tail_rows: DEFAULT_TAIL_ROWS,
        }
    }
}

impl StrategyConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check every numeric parameter without touching any data.
    pub fn validate(&self) -> Result<(Momentum, FixedPercentLevels), ParamError> {
        let momentum = Momentum::new(self.window)?;
        let levels = FixedPercentLevels::new(self.stop_loss_pct, self.take_profit_pct)?;
        Ok((momentum, levels))
    }
}
