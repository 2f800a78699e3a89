//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, CSV
//! import, synthetic) so the pipeline can swap implementations and tests can
//! substitute an in-memory table.

use super::table::PriceTable;
use crate::domain::{Period, PriceSeries, SeriesError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no price data for '{symbol}' over period {period} (unknown or delisted symbol?)")]
    DataUnavailable { symbol: String, period: Period },

    #[error("cannot locate close prices for '{symbol}': {detail}")]
    ColumnResolution { symbol: String, detail: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider refused the request (HTTP {status})")]
    AccessDenied { status: u16 },

    #[error("HTTP {status} for '{symbol}'")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed price series for '{symbol}': {source}")]
    Malformed {
        symbol: String,
        #[source]
        source: SeriesError,
    },
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Trait for price data providers.
///
/// A provider returns the raw table in whatever column layout its source
/// uses; [`fetch_price_series`] resolves it into the canonical series.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn source(&self) -> DataSource;

    /// Fetch daily prices for a symbol over a period.
    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceTable, DataError>;
}

/// Fetch a symbol's close-price history and normalize it into a `PriceSeries`.
///
/// Fails with `DataUnavailable` when the provider has no rows, or no rows
/// with a close price, for the symbol/period.
pub fn fetch_price_series(
    provider: &dyn DataProvider,
    symbol: &str,
    period: Period,
) -> Result<PriceSeries, DataError> {
    info!(provider = provider.name(), symbol, %period, "fetching price data");

    let table = provider.fetch(symbol, period)?;
    let unavailable = || DataError::DataUnavailable {
        symbol: symbol.to_string(),
        period,
    };

    if table.is_empty() {
        return Err(unavailable());
    }

    let points = table.resolve_close(symbol)?;
    if points.is_empty() {
        return Err(unavailable());
    }

    let series = PriceSeries::new(symbol, points).map_err(|source| DataError::Malformed {
        symbol: symbol.to_string(),
        source,
    })?;

    debug!(
        rows = series.len(),
        first = %series.points()[0].date,
        last = %series.latest().date,
        "price series ready"
    );
    Ok(series)
}
