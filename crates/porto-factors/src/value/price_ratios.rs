//! Price Ratio Factor
//!
//! Inner join of the quality and size tables. Denominators are used as they
//! are: a zero or negative statement value yields an infinite or negative
//! ratio, a missing one yields `NaN`.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::quality::QualityRecord;
use crate::registry::FactorCategory;
use crate::size::SizeRecord;
use crate::table::{FactorRecord, FactorTable};
use crate::traits::Factor;
use chrono::NaiveDate;
use porto_data::SecurityYear;
use serde::Serialize;

/// Price ratios of one security-year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Size snapshot date
    pub date: NaiveDate,
    /// Market cap over assets
    pub pbr: f64,
    /// Market cap over revenue
    pub psr: f64,
    /// Market cap over operating income
    pub por: f64,
    /// Market cap over EBITDA
    pub per: f64,
    /// Market cap over cash flow
    pub pcr: f64,
}

impl FactorRecord for ValueRecord {
    const COLUMNS: &'static [FactorColumn] = &[
        FactorColumn::Pbr,
        FactorColumn::Psr,
        FactorColumn::Por,
        FactorColumn::Per,
        FactorColumn::Pcr,
    ];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn values(&self) -> Vec<f64> {
        vec![self.pbr, self.psr, self.por, self.per, self.pcr]
    }
}

/// PriceRatio divides market capitalization by each statement level
#[derive(Debug, Default)]
pub struct PriceRatioFactor;

impl Factor for PriceRatioFactor {
    type Input<'a> = (&'a FactorTable<QualityRecord>, &'a FactorTable<SizeRecord>);
    type Record = ValueRecord;

    fn name(&self) -> &str {
        "value"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Value
    }

    fn compute(&self, input: Self::Input<'_>) -> Result<FactorTable<ValueRecord>> {
        let (quality, size) = input;
        FactorTable::from_records(quality.iter().filter_map(|q| {
            let s = size.get(&q.key)?;
            let cap = s.market_capitalization;
            Some(ValueRecord {
                key: q.key.clone(),
                date: s.date,
                pbr: cap / q.assets,
                psr: cap / q.revenue,
                por: cap / q.operating_income,
                per: cap / q.ebitda,
                pcr: cap / q.cash_flow,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quality(id: &str, year: i32, assets: f64) -> QualityRecord {
        QualityRecord {
            key: SecurityYear::new("170", id, year),
            statement_date: date(year - 2, 12, 31),
            assets,
            revenue: 250.0,
            operating_income: -100.0,
            ebitda: f64::NAN,
            cash_flow: 50.0,
        }
    }

    fn size(id: &str, year: i32, cap: f64) -> SizeRecord {
        SizeRecord {
            key: SecurityYear::new("170", id, year),
            date: date(year, 1, 2),
            market_capitalization: cap,
        }
    }

    #[test]
    fn test_factor_name() {
        assert_eq!(PriceRatioFactor.name(), "value");
        assert_eq!(PriceRatioFactor.category(), FactorCategory::Value);
    }

    #[test]
    fn test_ratios() {
        let q = FactorTable::from_records([quality("A", 2020, 500.0)]).unwrap();
        let s = FactorTable::from_records([size("A", 2020, 1000.0)]).unwrap();
        let table = PriceRatioFactor.compute((&q, &s)).unwrap();
        let record = table.iter().next().unwrap();

        assert_eq!(record.pbr, 2.0);
        assert_eq!(record.psr, 4.0);
        assert_eq!(record.por, -10.0);
        assert!(record.per.is_nan());
        assert_eq!(record.pcr, 20.0);
        assert_eq!(record.date, date(2020, 1, 2));
    }

    #[test]
    fn test_zero_assets_is_not_finite() {
        let q = FactorTable::from_records([quality("A", 2020, 0.0)]).unwrap();
        let s = FactorTable::from_records([size("A", 2020, 1000.0)]).unwrap();
        let table = PriceRatioFactor.compute((&q, &s)).unwrap();
        assert!(!table.iter().next().unwrap().pbr.is_finite());
    }

    #[test]
    fn test_only_matching_keys_survive() {
        let q = FactorTable::from_records([quality("A", 2020, 1.0), quality("B", 2020, 1.0)])
            .unwrap();
        let s = FactorTable::from_records([size("A", 2020, 1.0), size("A", 2021, 1.0)]).unwrap();
        let table = PriceRatioFactor.compute((&q, &s)).unwrap();
        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, vec![SecurityYear::new("170", "A", 2020)]);
    }
}
