//! Market price series preparation.

pub mod series;

pub use series::{prepare_market, PricePoint, PriceSeries, RawPricePoint};
