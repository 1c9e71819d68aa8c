//! Statement Quality Factor
//!
//! Projects assets, revenue, operating income, EBITDA and operating cash flow
//! of each fiscal year onto the calendar year they become usable in.

use crate::column::FactorColumn;
use crate::error::{FactorError, Result};
use crate::registry::FactorCategory;
use crate::table::{FactorRecord, FactorTable};
use crate::traits::{Factor, StyleFactor};
use chrono::NaiveDate;
use porto_data::{PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};

/// Configuration for the Quality factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Years between fiscal year and usage year (default: 2)
    pub disclosure_lag: i32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self { disclosure_lag: 2 }
    }
}

/// Statement levels attributed to one security-year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityRecord {
    /// Security-year (fiscal year plus lag)
    pub key: SecurityYear,
    /// Statement date
    pub statement_date: NaiveDate,
    /// Total assets
    pub assets: f64,
    /// Revenue
    pub revenue: f64,
    /// Operating income
    pub operating_income: f64,
    /// EBITDA
    pub ebitda: f64,
    /// Operating cash flow
    pub cash_flow: f64,
}

impl FactorRecord for QualityRecord {
    const COLUMNS: &'static [FactorColumn] = &[
        FactorColumn::Assets,
        FactorColumn::Revenue,
        FactorColumn::OperatingIncome,
        FactorColumn::Ebitda,
        FactorColumn::CashFlow,
    ];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.statement_date
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.assets,
            self.revenue,
            self.operating_income,
            self.ebitda,
            self.cash_flow,
        ]
    }
}

/// Quality carries statement levels forward by the disclosure lag
#[derive(Debug)]
pub struct QualityFactor {
    config: QualityConfig,
}

impl Factor for QualityFactor {
    type Input<'a> = &'a PanelDataset;
    type Record = QualityRecord;

    fn name(&self) -> &str {
        "quality"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Quality
    }

    fn compute(&self, dataset: &PanelDataset) -> Result<FactorTable<QualityRecord>> {
        let lag = self.config.disclosure_lag;
        if lag < 0 {
            return Err(FactorError::InvalidConfig(format!(
                "disclosure lag must not be negative, got {lag}"
            )));
        }
        FactorTable::from_records(dataset.fundamentals().iter().map(|f| QualityRecord {
            key: SecurityYear::new(f.exchange.clone(), f.security_id.clone(), f.fiscal_year + lag),
            statement_date: f.statement_date,
            assets: f.assets,
            revenue: f.revenue,
            operating_income: f.operating_income,
            ebitda: f.ebitda,
            cash_flow: f.cash_flow,
        }))
    }
}

impl StyleFactor for QualityFactor {
    type Config = QualityConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for QualityFactor {
    fn default() -> Self {
        Self::with_config(QualityConfig::default())
    }
}
