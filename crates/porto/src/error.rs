//! Error types for a pipeline run.

use porto_data::DataError;
use porto_factors::FactorError;
use porto_model::ModelError;
use thiserror::Error;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PortoError {
    /// Fetching or parsing raw data failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// A factor calculator failed
    #[error(transparent)]
    Factor(#[from] FactorError),

    /// Filtering or the regression failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PortoError>;
