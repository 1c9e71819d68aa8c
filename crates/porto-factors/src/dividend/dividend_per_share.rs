//! Dividend Per Share Factor
//!
//! The dividend per share reported on the annual snapshot date.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::registry::FactorCategory;
use crate::snapshot::{AnnualSnapshot, SnapshotMonth};
use crate::table::{FactorRecord, FactorTable};
use crate::traits::{Factor, StyleFactor};
use chrono::NaiveDate;
use porto_data::{PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};

/// Configuration for the Dividend factor
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DividendConfig {
    /// Month the annual snapshot is taken in (default: January)
    pub snapshot_month: SnapshotMonth,
}

/// Dividend per share of one security-year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Snapshot date
    pub date: NaiveDate,
    /// Dividend per share
    pub dividend_per_share: f64,
}

impl FactorRecord for YieldRecord {
    const COLUMNS: &'static [FactorColumn] = &[FactorColumn::DividendPerShare];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn values(&self) -> Vec<f64> {
        vec![self.dividend_per_share]
    }
}

/// Dividend samples dividend per share at the annual snapshot
#[derive(Debug)]
pub struct DividendFactor {
    config: DividendConfig,
}

impl Factor for DividendFactor {
    type Input<'a> = &'a PanelDataset;
    type Record = YieldRecord;

    fn name(&self) -> &str {
        "yield"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Yield
    }

    fn compute(&self, dataset: &PanelDataset) -> Result<FactorTable<YieldRecord>> {
        AnnualSnapshot::new(self.config.snapshot_month).extract(dataset.prices(), |key, row| {
            YieldRecord {
                key,
                date: row.date,
                dividend_per_share: row.dividend_per_share,
            }
        })
    }
}

impl StyleFactor for DividendFactor {
    type Config = DividendConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for DividendFactor {
    fn default() -> Self {
        Self::with_config(DividendConfig::default())
    }
}
