#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/porto/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod column;
pub mod dividend;
pub mod error;
pub mod growth;
pub mod liquidity;
pub mod momentum;
pub mod quality;
pub mod registry;
pub mod rolling;
pub mod size;
pub mod snapshot;
pub mod table;
pub mod traits;
pub mod value;
pub mod volatility;

// Re-export common types
pub use column::FactorColumn;
pub use error::{FactorError, Result};
pub use snapshot::{AnnualSnapshot, Observation, SnapshotMonth};
pub use table::{FactorRecord, FactorTable};
pub use traits::{Factor, StyleFactor};

// Re-export calculators and their records
pub use dividend::{DividendConfig, DividendFactor, YieldRecord};
pub use growth::{GrowthRecord, StatementGrowthFactor};
pub use liquidity::{LiquidityRecord, TransactionAmountConfig, TransactionAmountFactor};
pub use momentum::{CalendarMomentumConfig, CalendarMomentumFactor, MomentumRecord};
pub use quality::{QualityConfig, QualityFactor, QualityRecord};
pub use size::{MarketCapConfig, MarketCapFactor, SizeRecord};
pub use value::{PriceRatioFactor, ValueRecord};
pub use volatility::{HistoricalVolatilityConfig, HistoricalVolatilityFactor, VolatilityRecord};

// Re-export registry types for convenience
pub use registry::{
    FactorCategory, FactorInfo, available_factors, get_factor_info, list_factor_names,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
