#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/porto/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod linalg;
pub mod merge;
pub mod normalize;
pub mod panel;
pub mod regression;

// Re-export main types
pub use error::{ModelError, Result};
pub use merge::{FactorMerger, FactorTables};
pub use normalize::CrossSectionalNormalizer;
pub use panel::{FactorPanel, PanelRow};
pub use regression::{
    CoefficientEstimate, DesignMatrix, OlsFit, OlsRegressor, RegressionSummary,
    SignificanceFilter,
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
