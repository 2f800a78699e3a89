//! End-to-end pipeline tests against in-memory providers.

use chrono::NaiveDate;
use momentum_core::data::{
    ColumnKey, DataError, DataProvider, DataSource, FlatPriceTable, KeyedPriceTable, PriceTable,
};
use momentum_core::domain::Period;
use momentum_core::signals::Signal;
use momentum_core::{run_pipeline, ParamError, PipelineError, StrategyConfig};

// ── Helpers ──────────────────────────────────────────────────────────

fn dates(n: usize) -> Vec<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    (0..n)
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect()
}

fn flat_table(closes: &[f64]) -> PriceTable {
    let mut table = FlatPriceTable::new(dates(closes.len()));
    table
        .push_column("Open", closes.iter().map(|c| Some(c - 1.0)).collect())
        .unwrap();
    table
        .push_column("Close", closes.iter().copied().map(Some).collect())
        .unwrap();
    table.into()
}

fn keyed_table(symbol: &str, closes: &[f64]) -> PriceTable {
    let mut table = KeyedPriceTable::new(dates(closes.len()));
    table
        .push_column(
            ColumnKey::new("Close", "OTHER"),
            closes.iter().map(|c| Some(c * 2.0)).collect(),
        )
        .unwrap();
    table
        .push_column(
            ColumnKey::new("Close", symbol),
            closes.iter().copied().map(Some).collect(),
        )
        .unwrap();
    table.into()
}

/// Serves one table for every symbol, or fails the way a real source would.
enum InMemoryProvider {
    Table(PriceTable),
    Unknown,
    RateLimited,
}

impl DataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceTable, DataError> {
        match self {
            Self::Table(table) => Ok(table.clone()),
            Self::Unknown => Err(DataError::DataUnavailable {
                symbol: symbol.to_string(),
                period,
            }),
            Self::RateLimited => Err(DataError::RateLimited {
                retry_after_secs: 30,
            }),
        }
    }
}

fn with_window(window: i64) -> StrategyConfig {
    StrategyConfig {
        window,
        ..StrategyConfig::default()
    }
}

fn rising() -> Vec<f64> {
    (100..=124).map(f64::from).collect()
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn rising_prices_go_long_after_window() {
    let closes = rising();
    let provider = InMemoryProvider::Table(flat_table(&closes));
    let report = run_pipeline(&provider, "TEST", &with_window(20)).unwrap();

    assert_eq!(report.rows.len(), 25);
    assert!(report.rows[..20]
        .iter()
        .all(|r| r.momentum.is_none() && r.signal.is_none()));
    assert_eq!(report.rows[20].momentum, Some(closes[20] / closes[0] - 1.0));
    assert_eq!(report.rows[20].signal, Some(Signal::Long));
    assert!(report.rows[20..]
        .iter()
        .all(|r| r.signal == Some(Signal::Long)));

    assert_eq!(report.reference_close, 124.0);
    assert_eq!(report.risk.stop_loss, 124.0 - 124.0 * 0.05);
    assert_eq!(report.risk.take_profit, 124.0 + 124.0 * 0.10);
}

#[test]
fn flat_prices_are_short() {
    let provider = InMemoryProvider::Table(flat_table(&[50.0; 10]));
    let report = run_pipeline(&provider, "TEST", &with_window(3)).unwrap();

    for row in &report.rows[3..] {
        assert_eq!(row.momentum, Some(0.0));
        assert_eq!(row.signal, Some(Signal::Short));
    }
}

#[test]
fn non_positive_window_is_invalid_parameter() {
    let provider = InMemoryProvider::Table(flat_table(&rising()));
    for window in [0, -1] {
        let err = run_pipeline(&provider, "TEST", &with_window(window)).unwrap_err();
        assert!(
            matches!(err, PipelineError::Param(ParamError::InvalidParameter(_))),
            "window {window}: {err}"
        );
    }
}

#[test]
fn oversized_window_yields_no_signals() {
    let provider = InMemoryProvider::Table(flat_table(&rising()));
    let report = run_pipeline(&provider, "TEST", &with_window(1000)).unwrap();

    assert_eq!(report.rows.len(), 25);
    assert!(report.rows.iter().all(|r| r.momentum.is_none()));
    assert_eq!(report.latest_signal(), None);
    // Risk levels only need the latest close.
    assert_eq!(report.reference_close, 124.0);
}

#[test]
fn unknown_symbol_is_data_unavailable() {
    let err = run_pipeline(&InMemoryProvider::Unknown, "NOPE", &StrategyConfig::default())
        .unwrap_err();
    match err {
        PipelineError::Data(DataError::DataUnavailable { symbol, period }) => {
            assert_eq!(symbol, "NOPE");
            assert_eq!(period, Period::OneYear);
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn provider_errors_pass_through_unchanged() {
    let err = run_pipeline(&InMemoryProvider::RateLimited, "SPY", &StrategyConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Data(DataError::RateLimited {
            retry_after_secs: 30
        })
    ));
}

#[test]
fn keyed_and_flat_tables_agree() {
    let closes = [100.0, 102.0, 101.0, 105.0, 103.0, 108.0];
    let flat = run_pipeline(
        &InMemoryProvider::Table(flat_table(&closes)),
        "AAPL",
        &with_window(2),
    )
    .unwrap();
    let keyed = run_pipeline(
        &InMemoryProvider::Table(keyed_table("AAPL", &closes)),
        "AAPL",
        &with_window(2),
    )
    .unwrap();

    assert_eq!(flat.rows, keyed.rows);
    assert_eq!(flat.risk, keyed.risk);
}

#[test]
fn keyed_table_without_symbol_fails_resolution() {
    let provider = InMemoryProvider::Table(keyed_table("AAPL", &rising()));
    let err = run_pipeline(&provider, "MSFT", &with_window(5)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Data(DataError::ColumnResolution { .. })
    ));
}

#[test]
fn missing_closes_are_dropped_before_momentum() {
    let mut table = FlatPriceTable::new(dates(4));
    table
        .push_column("Close", vec![Some(100.0), None, Some(110.0), Some(121.0)])
        .unwrap();
    let provider = InMemoryProvider::Table(table.into());
    let report = run_pipeline(&provider, "TEST", &with_window(1)).unwrap();

    assert_eq!(report.rows.len(), 3);
    assert!((report.rows[1].momentum.unwrap() - 0.10).abs() < 1e-12);
}
