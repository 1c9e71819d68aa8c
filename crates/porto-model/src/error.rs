//! Errors raised while merging, normalizing and fitting the panel.

use thiserror::Error;

/// Errors that can occur in the modelling stages
#[derive(Debug, Error)]
pub enum ModelError {
    /// Nothing left to fit
    #[error("Insufficient data: {rows} complete rows and {regressors} regressors")]
    InsufficientData {
        /// Rows surviving the missing-value filter
        rows: usize,
        /// Regressors surviving the missing-value filter
        regressors: usize,
    },

    /// The forward return itself was dropped by the missing-value filter
    #[error("Dependent column '{column}' dropped: {missing_fraction:.2} of values missing")]
    DependentDropped {
        /// Name of the dependent column
        column: &'static str,
        /// Its missing fraction
        missing_fraction: f64,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for modelling operations.
pub type Result<T> = std::result::Result<T, ModelError>;
