//! Value factors - price relative to fundamentals
//!
//! Market capitalization at the annual snapshot over the lagged statement
//! levels of the same security-year.

pub mod price_ratios;

pub use price_ratios::{PriceRatioFactor, ValueRecord};
