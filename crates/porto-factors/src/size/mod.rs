//! Size factors - measures of market capitalization
//!
//! Size is sampled once a year from the daily market capitalization, at the
//! first trading day of the snapshot month.

pub mod market_cap;

pub use market_cap::{MarketCapConfig, MarketCapFactor, SizeRecord};
