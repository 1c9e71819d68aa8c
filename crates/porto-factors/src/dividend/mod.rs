//! Yield factors - cash distributed to shareholders

pub mod dividend_per_share;

pub use dividend_per_share::{DividendConfig, DividendFactor, YieldRecord};
