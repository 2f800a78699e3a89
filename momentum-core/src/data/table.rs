//! Provider response tables and close-column resolution.
//!
//! Providers do not agree on a column layout. A single-symbol response keys
//! columns by field name (`Close`); a multi-symbol response keys them by
//! `(field, symbol)`. `PriceTable` tags which layout arrived, and
//! [`PriceTable::resolve_close`] is the one place that turns either into
//! chronological close prices.

use super::provider::DataError;
use crate::domain::PricePoint;
use chrono::NaiveDate;
use std::fmt;
use tracing::debug;

const CLOSE_FIELD: &str = "Close";

/// Column key in a multi-symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKey {
    pub field: String,
    pub symbol: String,
}

impl ColumnKey {
    pub fn new(field: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.field, self.symbol)
    }
}

/// Date-indexed table whose columns carry a key of type `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<K> {
    dates: Vec<NaiveDate>,
    columns: Vec<(K, Vec<Option<f64>>)>,
}

/// Single-symbol layout: columns keyed by field name.
pub type FlatPriceTable = Table<String>;

/// Multi-symbol layout: columns keyed by `(field, symbol)`.
pub type KeyedPriceTable = Table<ColumnKey>;

impl<K> Table<K> {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Append a column. Its length must match the date index.
    pub fn push_column(
        &mut self,
        key: impl Into<K>,
        values: Vec<Option<f64>>,
    ) -> Result<(), DataError> {
        if values.len() != self.dates.len() {
            return Err(DataError::ResponseFormatChanged(format!(
                "column has {} values for {} dates",
                values.len(),
                self.dates.len()
            )));
        }
        self.columns.push((key.into(), values));
        Ok(())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.columns.iter().map(|(k, _)| k)
    }

    fn column_where(&self, pred: impl Fn(&K) -> bool) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(k, _)| pred(k))
            .map(|(_, v)| v.as_slice())
    }
}

/// Provider response in one of the two supported layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceTable {
    Flat(FlatPriceTable),
    Keyed(KeyedPriceTable),
}

impl PriceTable {
    pub fn row_count(&self) -> usize {
        match self {
            PriceTable::Flat(t) => t.row_count(),
            PriceTable::Keyed(t) => t.row_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Select the close-price column belonging to `symbol` and return its
    /// defined values as date-sorted points, first occurrence winning on
    /// duplicate dates.
    ///
    /// Flat tables use their `Close` column regardless of `symbol`. Keyed
    /// tables use the `(Close, symbol)` column. Field and symbol matching is
    /// ASCII case-insensitive. `Adj Close` is never substituted.
    pub fn resolve_close(&self, symbol: &str) -> Result<Vec<PricePoint>, DataError> {
        let unresolved = |detail: String| DataError::ColumnResolution {
            symbol: symbol.to_string(),
            detail,
        };

        let (dates, closes) = match self {
            PriceTable::Flat(t) => {
                let closes = t
                    .column_where(|k| k.eq_ignore_ascii_case(CLOSE_FIELD))
                    .ok_or_else(|| {
                        let fields: Vec<&str> = t.keys().map(String::as_str).collect();
                        unresolved(format!("no Close column among [{}]", fields.join(", ")))
                    })?;
                (t.dates(), closes)
            }
            PriceTable::Keyed(t) => {
                let closes = t
                    .column_where(|k| {
                        k.field.eq_ignore_ascii_case(CLOSE_FIELD)
                            && k.symbol.eq_ignore_ascii_case(symbol)
                    })
                    .ok_or_else(|| {
                        let close_symbols: Vec<&str> = t
                            .keys()
                            .filter(|k| k.field.eq_ignore_ascii_case(CLOSE_FIELD))
                            .map(|k| k.symbol.as_str())
                            .collect();
                        if close_symbols.is_empty() {
                            unresolved("keyed table has no Close field".into())
                        } else {
                            unresolved(format!(
                                "no (Close, {symbol}) column; Close is keyed for [{}]",
                                close_symbols.join(", ")
                            ))
                        }
                    })?;
                (t.dates(), closes)
            }
        };

        Ok(collect_points(dates, closes))
    }
}

impl From<FlatPriceTable> for PriceTable {
    fn from(t: FlatPriceTable) -> Self {
        PriceTable::Flat(t)
    }
}

impl From<KeyedPriceTable> for PriceTable {
    fn from(t: KeyedPriceTable) -> Self {
        PriceTable::Keyed(t)
    }
}

/// Pair dates with defined closes, sort, and drop duplicate dates.
fn collect_points(dates: &[NaiveDate], closes: &[Option<f64>]) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = dates
        .iter()
        .zip(closes)
        .filter_map(|(&date, close)| match close {
            Some(c) if !c.is_nan() => Some(PricePoint::new(date, *c)),
            _ => None,
        })
        .collect();

    let missing = dates.len() - points.len();
    if missing > 0 {
        debug!(missing, "dropped rows without a close price");
    }

    // Stable sort keeps the provider's order among equal dates.
    points.sort_by_key(|p| p.date);
    let before = points.len();
    points.dedup_by_key(|p| p.date);
    if points.len() < before {
        debug!(duplicates = before - points.len(), "dropped duplicate dates");
    }

    points
}
