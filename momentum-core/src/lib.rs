//! Momentum Core: price data, momentum indicator, signals, risk levels.
//!
//! The crate is a single forward pipeline:
//! - Data providers (Yahoo Finance, CSV import, synthetic) normalized into a `PriceSeries`
//! - Rolling percentage-change momentum over a fixed lookback window
//! - Sign-threshold long/short signal per bar
//! - Fixed-percentage stop-loss / take-profit levels off the latest close
//! - Orchestration into a renderable `Report`

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod risk;
pub mod signals;

pub use config::{ConfigError, StrategyConfig};
pub use error::{ParamError, PipelineError};
pub use pipeline::{run_pipeline, Report};
