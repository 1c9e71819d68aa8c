//! Market Capitalization Factor
//!
//! Close price times shares outstanding, taken at the earliest January
//! observation of every security-year.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::registry::FactorCategory;
use crate::snapshot::{AnnualSnapshot, SnapshotMonth};
use crate::table::{FactorRecord, FactorTable};
use crate::traits::{Factor, StyleFactor};
use chrono::NaiveDate;
use porto_data::{PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};

/// Configuration for the MarketCap factor
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MarketCapConfig {
    /// Month the annual snapshot is taken in (default: January)
    pub snapshot_month: SnapshotMonth,
}

/// Market capitalization of one security-year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Snapshot date
    pub date: NaiveDate,
    /// Market capitalization
    pub market_capitalization: f64,
}

impl FactorRecord for SizeRecord {
    const COLUMNS: &'static [FactorColumn] = &[FactorColumn::MarketCapitalization];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn values(&self) -> Vec<f64> {
        vec![self.market_capitalization]
    }
}

/// MarketCap samples market capitalization at the annual snapshot
#[derive(Debug)]
pub struct MarketCapFactor {
    config: MarketCapConfig,
}

impl Factor for MarketCapFactor {
    type Input<'a> = &'a PanelDataset;
    type Record = SizeRecord;

    fn name(&self) -> &str {
        "size"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Size
    }

    fn compute(&self, dataset: &PanelDataset) -> Result<FactorTable<SizeRecord>> {
        AnnualSnapshot::new(self.config.snapshot_month).extract(dataset.prices(), |key, row| {
            SizeRecord {
                key,
                date: row.date,
                market_capitalization: row.market_capitalization,
            }
        })
    }
}

impl StyleFactor for MarketCapFactor {
    type Config = MarketCapConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for MarketCapFactor {
    fn default() -> Self {
        Self::with_config(MarketCapConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porto_data::{DailyObservation, DateRange};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn observation(id: &str, d: NaiveDate, cap: f64) -> DailyObservation {
        let mut obs = DailyObservation::empty("170", id, d);
        obs.market_capitalization = cap;
        obs
    }

    fn dataset(prices: Vec<DailyObservation>) -> PanelDataset {
        let range = DateRange::new(date(2018, 1, 1), date(2022, 1, 1)).unwrap();
        PanelDataset::new("Korea", range, prices, Vec::new())
    }

    #[test]
    fn test_factor_name() {
        let factor = MarketCapFactor::default();
        assert_eq!(factor.name(), "size");
        assert_eq!(factor.category(), FactorCategory::Size);
        assert_eq!(factor.columns(), &[FactorColumn::MarketCapitalization]);
    }

    #[test]
    fn test_snapshot_takes_minimum_january_date() {
        let data = dataset(vec![
            observation("A", date(2020, 1, 3), 200.0),
            observation("A", date(2020, 1, 2), 100.0),
            observation("A", date(2020, 2, 3), 300.0),
            observation("B", date(2020, 1, 6), 50.0),
        ]);
        let table = MarketCapFactor::default().compute(&data).unwrap();
        assert_eq!(table.len(), 2);

        let a = table.get(&SecurityYear::new("170", "A", 2020)).unwrap();
        assert_eq!(a.date, date(2020, 1, 2));
        assert_eq!(a.market_capitalization, 100.0);
    }

    #[test]
    fn test_custom_config() {
        let config = MarketCapConfig {
            snapshot_month: SnapshotMonth::new(2).unwrap(),
        };
        let factor = MarketCapFactor::with_config(config);
        assert_eq!(factor.config().snapshot_month.number(), 2);

        let data = dataset(vec![
            observation("A", date(2020, 1, 2), 100.0),
            observation("A", date(2020, 2, 3), 300.0),
        ]);
        let table = factor.compute(&data).unwrap();
        assert_eq!(table.iter().next().unwrap().market_capitalization, 300.0);
    }
}
