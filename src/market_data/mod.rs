pub mod bar;
pub mod series;

// Re-export the core input types for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar::{Bar, BarSeries, PriceSource};
pub use series::Series;
