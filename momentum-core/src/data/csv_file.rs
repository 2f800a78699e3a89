//! CSV import provider.
//!
//! Reads daily prices exported by common downloaders. Two layouts are
//! recognized:
//!
//! Flat (one symbol):
//! ```text
//! Date,Open,High,Low,Close,Adj Close,Volume
//! 2024-01-02,472.16,473.67,470.49,472.65,465.8,123623700
//! ```
//!
//! Keyed (multi-row header, columns keyed by field and ticker):
//! ```text
//! Price,Close,Close,Open,Open
//! Ticker,AAPL,MSFT,AAPL,MSFT
//! Date,,,,
//! 2024-01-02,185.64,370.87,187.15,373.86
//! ```
//!
//! Empty cells are missing values. The period is anchored at the last date
//! in the file.

use super::provider::{DataError, DataProvider, DataSource};
use super::table::{ColumnKey, FlatPriceTable, KeyedPriceTable, PriceTable};
use crate::domain::Period;
use chrono::NaiveDate;
use csv::StringRecord;
use std::path::PathBuf;
use tracing::debug;

/// One parsed data row.
struct Row {
    date: NaiveDate,
    values: Vec<Option<f64>>,
}

/// Header shape detected from the first records.
enum Layout {
    Flat { fields: Vec<String> },
    Keyed { keys: Vec<ColumnKey> },
}

/// Reads prices from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse CSV text into a table restricted to `period`.
    pub fn parse(content: &[u8], period: Period) -> Result<PriceTable, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let records = reader.records().collect::<Result<Vec<StringRecord>, _>>()?;
        if records.is_empty() {
            return Ok(PriceTable::Flat(FlatPriceTable::new(Vec::new())));
        }

        let (layout, data_start) = detect_layout(&records);
        let width = match &layout {
            Layout::Flat { fields } => fields.len(),
            Layout::Keyed { keys } => keys.len(),
        };

        let mut rows = records[data_start..]
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.iter().all(str::is_empty))
            .map(|(i, r)| parse_row(r, width, data_start + i + 1))
            .collect::<Result<Vec<Row>, DataError>>()?;
        rows.sort_by_key(|r| r.date);

        let rows = period.slice(&rows, |r| r.date);
        debug!(rows = rows.len(), %period, "parsed CSV rows");

        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let column = |j: usize| -> Vec<Option<f64>> { rows.iter().map(|r| r.values[j]).collect() };

        let table = match layout {
            Layout::Flat { fields } => {
                let mut t = FlatPriceTable::new(dates);
                for (j, field) in fields.into_iter().enumerate() {
                    t.push_column(field, column(j))?;
                }
                PriceTable::Flat(t)
            }
            Layout::Keyed { keys } => {
                let mut t = KeyedPriceTable::new(dates);
                for (j, key) in keys.into_iter().enumerate() {
                    t.push_column(key, column(j))?;
                }
                PriceTable::Keyed(t)
            }
        };
        Ok(table)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(&self, _symbol: &str, period: Period) -> Result<PriceTable, DataError> {
        let content = std::fs::read(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(&content, period)
    }
}

/// Work out the header layout and the index of the first data record.
///
/// The date column is always the first column; value columns follow it.
fn detect_layout(records: &[StringRecord]) -> (Layout, usize) {
    let first_cell = |r: &StringRecord| r.get(0).unwrap_or("").to_string();
    let value_cells = |r: &StringRecord| r.iter().skip(1).map(str::to_string).collect::<Vec<_>>();

    let is_keyed = records.len() >= 2
        && first_cell(&records[0]).eq_ignore_ascii_case("price")
        && first_cell(&records[1]).eq_ignore_ascii_case("ticker");

    if is_keyed {
        let fields = value_cells(&records[0]);
        let tickers = value_cells(&records[1]);
        let keys = fields
            .into_iter()
            .zip(tickers)
            .map(|(field, symbol)| ColumnKey::new(field, symbol))
            .collect();

        // Optional third header row naming the index column.
        let data_start = match records.get(2) {
            Some(r) if first_cell(r).eq_ignore_ascii_case("date") => 3,
            _ => 2,
        };
        return (Layout::Keyed { keys }, data_start);
    }

    (
        Layout::Flat {
            fields: value_cells(&records[0]),
        },
        1,
    )
}

fn parse_row(record: &StringRecord, width: usize, line: usize) -> Result<Row, DataError> {
    let raw_date = record.get(0).unwrap_or("");
    // Accept bare dates and datetime stamps such as `2024-01-02 00:00:00-05:00`.
    let date = raw_date
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("line {line}: invalid date '{raw_date}'"))
        })?;

    let values = (1..=width)
        .map(|j| match record.get(j).unwrap_or("") {
            "" => Ok(None),
            cell => cell.parse::<f64>().map(Some).map_err(|_| {
                DataError::ResponseFormatChanged(format!("line {line}: invalid number '{cell}'"))
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Row { date, values })
}
