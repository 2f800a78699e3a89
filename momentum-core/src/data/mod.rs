//! Price data providers and response normalization

pub mod csv_file;
pub mod provider;
pub mod synthetic;
pub mod table;
pub mod yahoo;

pub use csv_file::CsvProvider;
pub use provider::{fetch_price_series, DataError, DataProvider, DataSource};
pub use synthetic::SyntheticProvider;
pub use table::{ColumnKey, FlatPriceTable, KeyedPriceTable, PriceTable};
pub use yahoo::YahooProvider;
