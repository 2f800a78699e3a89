//! Momentum CLI: fetch prices for one symbol, print the momentum signal table
//! and stop-loss / take-profit levels for the latest close.
//!
//! Data comes from Yahoo Finance by default, or from a local CSV export
//! (`--csv`) or a seeded random walk (`--synthetic`).

use anyhow::{Context, Result};
use clap::Parser;
use momentum_core::data::{
    CsvProvider, DataProvider, DataSource, SyntheticProvider, YahooProvider,
};
use momentum_core::domain::Period;
use momentum_core::{run_pipeline, Report, StrategyConfig};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "momentum",
    version,
    about = "Momentum signal generator with fixed stop-loss / take-profit levels"
)]
struct Cli {
    /// Ticker symbol (e.g., AAPL, SPY, BTC-USD).
    symbol: String,

    /// History to fetch: 1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max. Defaults to 1y.
    #[arg(long)]
    period: Option<String>,

    /// Momentum lookback in bars. Defaults to 20.
    #[arg(long, allow_negative_numbers = true)]
    window: Option<i64>,

    /// Stop-loss distance below the latest close, as a fraction. Defaults to 0.05.
    #[arg(long, allow_negative_numbers = true)]
    stop_loss_pct: Option<f64>,

    /// Take-profit distance above the latest close, as a fraction. Defaults to 0.10.
    #[arg(long, allow_negative_numbers = true)]
    take_profit_pct: Option<f64>,

    /// Number of trailing rows to print. Defaults to 5.
    #[arg(long)]
    rows: Option<usize>,

    /// TOML file with defaults for the options above. Flags win over file values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read prices from a CSV file instead of Yahoo Finance.
    #[arg(long, conflicts_with = "synthetic")]
    csv: Option<PathBuf>,

    /// Use seeded synthetic prices (no network).
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for --synthetic.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the full report as JSON instead of the table.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    debug!(?config, "effective configuration");

    let provider = build_provider(&cli)?;
    let report = run_pipeline(provider.as_ref(), &cli.symbol, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, config.tail_rows));
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Config file values (or defaults), overridden by any flag given.
fn build_config(cli: &Cli) -> Result<StrategyConfig> {
    let mut config = match &cli.config {
        Some(path) => StrategyConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StrategyConfig::default(),
    };

    if let Some(period) = &cli.period {
        config.period = period.parse::<Period>()?;
    }
    if let Some(window) = cli.window {
        config.window = window;
    }
    if let Some(pct) = cli.stop_loss_pct {
        config.stop_loss_pct = pct;
    }
    if let Some(pct) = cli.take_profit_pct {
        config.take_profit_pct = pct;
    }
    if let Some(rows) = cli.rows {
        config.tail_rows = rows;
    }

    Ok(config)
}

fn build_provider(cli: &Cli) -> Result<Box<dyn DataProvider>> {
    if let Some(path) = &cli.csv {
        return Ok(Box::new(CsvProvider::new(path)));
    }
    if cli.synthetic {
        warn!(seed = cli.seed, "using synthetic prices; output is not market data");
        let today = chrono::Local::now().date_naive();
        return Ok(Box::new(SyntheticProvider::new(cli.seed, today)));
    }
    Ok(Box::new(YahooProvider::new()?))
}

/// Header block, then the signal table, then the risk lines.
fn render_report(report: &Report, rows: usize) -> String {
    let mut out = format!(
        "{} | period {} | window {} | {} bars\n",
        report.symbol,
        report.period,
        report.window,
        report.rows.len()
    );
    out.push_str(&format!(
        "Reference close: {:.2} ({})\n",
        report.reference_close, report.reference_date
    ));
    if report.source == DataSource::Synthetic {
        out.push_str("(synthetic data, not market prices)\n");
    }
    out.push('\n');
    out.push_str(&report.render_table(rows));
    out.push_str(&report.risk_lines());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("momentum").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let cli = parse(&["AAPL"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config, StrategyConfig::default());
        assert!(!cli.json);
        assert_eq!(cli.seed, 42);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "SPY",
            "--period",
            "6mo",
            "--window",
            "10",
            "--stop-loss-pct",
            "0.02",
            "--take-profit-pct",
            "0.3",
            "--rows",
            "8",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.period, Period::SixMonths);
        assert_eq!(config.window, 10);
        assert_eq!(config.stop_loss_pct, 0.02);
        assert_eq!(config.take_profit_pct, 0.3);
        assert_eq!(config.tail_rows, 8);
    }

    #[test]
    fn negative_window_reaches_validation() {
        let cli = parse(&["SPY", "--window", "-1"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.window, -1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_period_is_rejected() {
        let cli = parse(&["SPY", "--period", "2w"]);
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("unknown period"), "{err}");
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy.toml");
        std::fs::write(&path, "window = 30\nperiod = \"2y\"\n").unwrap();

        let cli = parse(&["SPY", "--config", path.to_str().unwrap(), "--window", "5"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.window, 5);
        assert_eq!(config.period, Period::TwoYears);
    }

    #[test]
    fn csv_and_synthetic_conflict() {
        let result = Cli::try_parse_from(["momentum", "SPY", "--csv", "p.csv", "--synthetic"]);
        assert!(result.is_err());
    }

    #[test]
    fn synthetic_provider_runs_offline() {
        let cli = parse(&["SPY", "--synthetic", "--seed", "7"]);
        let config = build_config(&cli).unwrap();
        let provider = build_provider(&cli).unwrap();
        let report = run_pipeline(provider.as_ref(), &cli.symbol, &config).unwrap();
        assert!(report.rows.len() > 20);
        assert!(report.latest_signal().is_some());
    }

    #[test]
    fn risk_lines_directly_follow_table() {
        let cli = parse(&["SPY", "--synthetic", "--rows", "3"]);
        let config = build_config(&cli).unwrap();
        let provider = build_provider(&cli).unwrap();
        let report = run_pipeline(provider.as_ref(), &cli.symbol, &config).unwrap();
        let out = render_report(&report, config.tail_rows);
        let lines: Vec<&str> = out.lines().collect();

        let header = lines.iter().position(|l| l.starts_with("Date")).unwrap();
        let reference = lines
            .iter()
            .position(|l| l.starts_with("Reference close:"))
            .unwrap();
        assert!(reference < header);

        // header + rule + 3 rows, then the two risk lines end the output.
        let n = lines.len();
        assert_eq!(n, header + 2 + 3 + 2);
        assert!(lines[n - 2].starts_with("Stop Loss: "));
        assert!(lines[n - 1].starts_with("Take Profit: "));
    }
}
