//! Domain types for the momentum pipeline

pub mod period;
pub mod price;

pub use period::Period;
pub use price::{PricePoint, PriceSeries, SeriesError};
