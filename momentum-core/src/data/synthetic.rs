//! Synthetic price provider.
//!
//! Developer-only mode for running the pipeline without network access.
//! Generates a seeded random walk of weekday closes ending on a fixed date.
//! The same seed, symbol, period and end date always produce the same series.

use super::provider::{DataError, DataProvider, DataSource};
use super::table::{FlatPriceTable, PriceTable};
use crate::domain::Period;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    end: NaiveDate,
    start_price: f64,
    max_daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64, end: NaiveDate) -> Self {
        Self {
            seed,
            end,
            start_price: 100.0,
            max_daily_move: 0.03,
        }
    }

    /// Deterministic RNG from the seed and symbol name.
    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// The last `n` weekdays up to and including `end`, oldest first.
    fn weekdays_ending(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(n);
        let mut current = end;
        while dates.len() < n {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                dates.push(current);
            }
            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }
        dates.reverse();
        dates
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceTable, DataError> {
        let dates = Self::weekdays_ending(self.end, period.trading_days(self.end));
        let mut rng = self.rng_for(symbol);

        let mut price = self.start_price;
        let closes = dates
            .iter()
            .map(|_| {
                let daily_return: f64 = rng.gen_range(-self.max_daily_move..self.max_daily_move);
                price *= 1.0 + daily_return;
                Some(price)
            })
            .collect();

        let mut table = FlatPriceTable::new(dates);
        table.push_column("Close", closes)?;
        Ok(PriceTable::Flat(table))
    }
}
