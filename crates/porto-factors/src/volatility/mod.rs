//! Volatility factors - measures of price variability
//!
//! Sample standard deviation of daily returns over trailing windows of one to
//! thirty-six months, observed at the annual snapshot.

pub mod historical_vol;

pub use historical_vol::{
    HistoricalVolatilityConfig, HistoricalVolatilityFactor, VolatilityRecord, daily_returns,
};
