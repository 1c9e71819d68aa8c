//! Statement Growth Factor
//!
//! `current / previous - 1` for every quality field, where `previous` is the
//! last non-missing value among the preceding records of the same security,
//! regardless of how many years lie between them. A missing level carries
//! that value forward and grows by zero. The first record of a security has
//! no growth.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::quality::QualityRecord;
use crate::registry::FactorCategory;
use crate::rolling::pct_change;
use crate::table::{FactorRecord, FactorTable};
use crate::traits::Factor;
use chrono::NaiveDate;
use porto_data::SecurityYear;
use serde::Serialize;

/// Year-over-year statement growth of one security-year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Statement date of the current record
    pub statement_date: NaiveDate,
    /// Asset growth
    pub assets_yoy: f64,
    /// Revenue growth
    pub revenue_yoy: f64,
    /// Operating income growth
    pub operating_income_yoy: f64,
    /// EBITDA growth
    pub ebitda_yoy: f64,
    /// Cash flow growth
    pub cash_flow_yoy: f64,
}

impl FactorRecord for GrowthRecord {
    const COLUMNS: &'static [FactorColumn] = &[
        FactorColumn::AssetsYoy,
        FactorColumn::RevenueYoy,
        FactorColumn::OperatingIncomeYoy,
        FactorColumn::EbitdaYoy,
        FactorColumn::CashFlowYoy,
    ];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.statement_date
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.assets_yoy,
            self.revenue_yoy,
            self.operating_income_yoy,
            self.ebitda_yoy,
            self.cash_flow_yoy,
        ]
    }
}

/// StatementGrowth computes year-over-year change of the quality levels
#[derive(Debug, Default)]
pub struct StatementGrowthFactor;

impl Factor for StatementGrowthFactor {
    type Input<'a> = &'a FactorTable<QualityRecord>;
    type Record = GrowthRecord;

    fn name(&self) -> &str {
        "growth"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Growth
    }

    fn compute(&self, quality: &FactorTable<QualityRecord>) -> Result<FactorTable<GrowthRecord>> {
        let rows: Vec<&QualityRecord> = quality.iter().collect();
        let mut records = Vec::with_capacity(rows.len());
        for security in rows.chunk_by(|a, b| {
            a.key.exchange == b.key.exchange && a.key.security_id == b.key.security_id
        }) {
            let growth = |field: fn(&QualityRecord) -> f64| {
                pct_change(&security.iter().map(|r| field(r)).collect::<Vec<_>>())
            };
            let assets = growth(|r| r.assets);
            let revenue = growth(|r| r.revenue);
            let operating_income = growth(|r| r.operating_income);
            let ebitda = growth(|r| r.ebitda);
            let cash_flow = growth(|r| r.cash_flow);
            records.extend(security.iter().enumerate().map(|(i, current)| GrowthRecord {
                key: current.key.clone(),
                statement_date: current.statement_date,
                assets_yoy: assets[i],
                revenue_yoy: revenue[i],
                operating_income_yoy: operating_income[i],
                ebitda_yoy: ebitda[i],
                cash_flow_yoy: cash_flow[i],
            }));
        }
        FactorTable::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quality(id: &str, year: i32, level: f64) -> QualityRecord {
        QualityRecord {
            key: SecurityYear::new("170", id, year),
            statement_date: NaiveDate::from_ymd_opt(year - 2, 12, 31).unwrap(),
            assets: level,
            revenue: level * 2.0,
            operating_income: level,
            ebitda: level,
            cash_flow: 0.0,
        }
    }

    #[test]
    fn test_factor_name() {
        assert_eq!(StatementGrowthFactor.name(), "growth");
        assert_eq!(StatementGrowthFactor.columns().len(), 5);
    }

    #[test]
    fn test_growth_against_previous_record() {
        let table = FactorTable::from_records([
            quality("A", 2019, 100.0),
            quality("A", 2020, 110.0),
            quality("A", 2022, 121.0),
        ])
        .unwrap();
        let growth = StatementGrowthFactor.compute(&table).unwrap();
        let rows: Vec<_> = growth.iter().collect();

        assert!(rows[0].assets_yoy.is_nan());
        assert_relative_eq!(rows[1].assets_yoy, 0.1, epsilon = 1e-12);
        assert_relative_eq!(rows[1].revenue_yoy, 0.1, epsilon = 1e-12);
        // a two-year gap still compares against the preceding record
        assert_relative_eq!(rows[2].assets_yoy, 0.1, epsilon = 1e-12);
        // zero base yields NaN (0 / 0 - 1)
        assert!(rows[1].cash_flow_yoy.is_nan());
    }

    #[test]
    fn test_missing_level_uses_last_known_value() {
        let mut gap = quality("A", 2020, 110.0);
        gap.assets = f64::NAN;
        let table = FactorTable::from_records([
            quality("A", 2019, 100.0),
            gap,
            quality("A", 2021, 121.0),
        ])
        .unwrap();
        let growth = StatementGrowthFactor.compute(&table).unwrap();
        let rows: Vec<_> = growth.iter().collect();

        assert_relative_eq!(rows[1].assets_yoy, 0.0);
        assert_relative_eq!(rows[1].revenue_yoy, 0.1, epsilon = 1e-12);
        assert_relative_eq!(rows[2].assets_yoy, 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_securities_do_not_leak() {
        let table =
            FactorTable::from_records([quality("A", 2020, 100.0), quality("B", 2021, 50.0)])
                .unwrap();
        let growth = StatementGrowthFactor.compute(&table).unwrap();
        assert!(growth.iter().all(|r| r.assets_yoy.is_nan()));
    }
}
