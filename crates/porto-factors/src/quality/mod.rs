//! Quality factors - lagged financial statement levels
//!
//! Statements of fiscal year `t` are attributed to calendar year `t + lag`
//! so that they are surely public at the January snapshot.

pub mod statements;

pub use statements::{QualityConfig, QualityFactor, QualityRecord};
