//! Liquidity factors - measures of trading activity
//!
//! Average daily traded value over trailing windows of one to thirty-six
//! months, observed at the annual snapshot.

pub mod transaction_amount;

pub use transaction_amount::{LiquidityRecord, TransactionAmountConfig, TransactionAmountFactor};
