//! Growth factors - measures of fundamental growth
//!
//! Year-over-year change of the lagged statement levels produced by the
//! quality factor.

pub mod statement_growth;

pub use statement_growth::{GrowthRecord, StatementGrowthFactor};
