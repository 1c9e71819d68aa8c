//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required input column is absent.
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn {
        /// Input table the column was expected in
        table: String,
        /// Name of the missing column
        column: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Country absent from the exchange mapping
    #[error("No exchanges mapped to country: {0}")]
    UnknownCountry(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Build a [`DataError::MissingColumn`].
    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_display() {
        let err = DataError::missing_column("prices", "adj_close_price");
        assert_eq!(
            err.to_string(),
            "Missing required column 'adj_close_price' in prices"
        );
    }

    #[test]
    fn test_date_range_display() {
        let err = DataError::InvalidDateRange {
            start: "2020-01-01".to_string(),
            end: "2019-01-01".to_string(),
        };
        assert!(err.to_string().contains("2020-01-01"));
    }
}
