//! Factor computation errors.

use porto_data::SecurityYear;
use thiserror::Error;

/// Errors raised while building factor tables.
#[derive(Debug, Error)]
pub enum FactorError {
    /// Two records were produced for the same security-year.
    #[error("Duplicate factor record for {0}")]
    DuplicateKey(SecurityYear),

    /// A column name that is not part of the factor panel.
    #[error("Unknown factor column: {0}")]
    UnknownColumn(String),

    /// A configuration value is out of range.
    #[error("Invalid factor configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for factor operations.
pub type Result<T> = std::result::Result<T, FactorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_display() {
        let err = FactorError::DuplicateKey(SecurityYear::new("170", "KR001", 2020));
        assert_eq!(err.to_string(), "Duplicate factor record for 170:KR001:2020");
    }
}
