//! Calculator traits shared by every factor.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::registry::FactorCategory;
use crate::table::{FactorRecord, FactorTable};

/// A calculator producing one factor table from explicit inputs.
pub trait Factor {
    /// What the calculator reads: the raw dataset or other factor tables.
    type Input<'a>;

    /// Row type of the produced table.
    type Record: FactorRecord;

    /// Unique factor name.
    fn name(&self) -> &str;

    /// Category of the factor.
    fn category(&self) -> FactorCategory;

    /// Compute the factor table.
    fn compute(&self, input: Self::Input<'_>) -> Result<FactorTable<Self::Record>>;

    /// Panel columns the table contributes.
    fn columns(&self) -> &'static [FactorColumn] {
        Self::Record::COLUMNS
    }
}

/// A factor whose computation is parameterized by a configuration value.
pub trait StyleFactor: Factor {
    /// Configuration type.
    type Config;

    /// Create the factor with an explicit configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Current configuration.
    fn config(&self) -> &Self::Config;
}
