//! Pipeline orchestration: fetch → momentum → signals → risk levels.
//!
//! A run is a single forward pass. The first failing stage ends it and its
//! error is returned unchanged; no partial report is ever produced.

use crate::config::StrategyConfig;
use crate::data::{fetch_price_series, DataProvider, DataSource};
use crate::domain::Period;
use crate::error::{ParamError, PipelineError};
use crate::indicators::Indicator;
use crate::risk::RiskLevels;
use crate::signals::{self, Signal};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::info;

/// One bar of pipeline output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub close: f64,
    pub momentum: Option<f64>,
    pub signal: Option<Signal>,
}

/// Completed run for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub symbol: String,
    pub period: Period,
    pub window: usize,
    pub source: DataSource,
    pub rows: Vec<ReportRow>,
    /// Close the risk levels are anchored on (the latest bar).
    pub reference_close: f64,
    pub reference_date: NaiveDate,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub risk: RiskLevels,
}

/// Run the full pipeline for `symbol`.
///
/// Parameters are validated before the provider is called, so a bad window
/// or percentage never costs a fetch.
pub fn run_pipeline(
    provider: &dyn DataProvider,
    symbol: &str,
    config: &StrategyConfig,
) -> Result<Report, PipelineError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ParamError::invalid("symbol must not be empty").into());
    }
    let (indicator, levels) = config.validate()?;

    let series = fetch_price_series(provider, symbol, config.period)?;
    let momentum = indicator.compute(&series);
    let signals = signals::generate(&momentum);

    let latest = *series.latest();
    let risk = levels.levels(latest.close)?;

    let rows: Vec<ReportRow> = series
        .points()
        .iter()
        .zip(momentum)
        .zip(signals)
        .map(|((p, momentum), signal)| ReportRow {
            date: p.date,
            close: p.close,
            momentum,
            signal,
        })
        .collect();

    info!(
        symbol,
        bars = rows.len(),
        window = indicator.window(),
        latest_close = latest.close,
        signal = ?rows.last().and_then(|r| r.signal),
        "pipeline complete"
    );

    Ok(Report {
        symbol: symbol.to_string(),
        period: config.period,
        window: indicator.window(),
        source: provider.source(),
        rows,
        reference_close: latest.close,
        reference_date: latest.date,
        stop_loss_pct: levels.stop_loss_pct(),
        take_profit_pct: levels.take_profit_pct(),
        risk,
    })
}

impl Report {
    /// Last `n` rows (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[ReportRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// Signal on the latest bar, if the window has filled.
    pub fn latest_signal(&self) -> Option<Signal> {
        self.rows.last().and_then(|r| r.signal)
    }

    /// Fixed-width table of the last `n` rows. Undefined values render as `-`.
    pub fn render_table(&self, n: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:>12} {:>10} {:>7}",
            "Date", "Close", "Momentum", "Signal"
        );
        let _ = writeln!(out, "{}", "-".repeat(42));
        for row in self.tail(n) {
            let momentum = row
                .momentum
                .map(|m| format!("{m:.4}"))
                .unwrap_or_else(|| "-".into());
            let signal = row
                .signal
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into());
            let _ = writeln!(
                out,
                "{:<10} {:>12.2} {:>10} {:>7}",
                row.date, row.close, momentum, signal
            );
        }
        out
    }

    /// `Stop Loss: <v>` and `Take Profit: <v>` lines, two decimals each.
    pub fn risk_lines(&self) -> String {
        format!(
            "Stop Loss: {:.2}\nTake Profit: {:.2}\n",
            self.risk.stop_loss, self.risk.take_profit
        )
    }
}
