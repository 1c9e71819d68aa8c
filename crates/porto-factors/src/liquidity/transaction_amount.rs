//! Transaction Amount Factor
//!
//! Adjusted close times adjusted volume, averaged over trailing windows with
//! a minimum-one-observation policy, so short histories still yield a value.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::registry::FactorCategory;
use crate::rolling::{HorizonWindows, RollingStatistic, TRADING_DAYS_PER_MONTH, WindowPolicy};
use crate::snapshot::{AnnualSnapshot, SnapshotMonth};
use crate::table::{FactorRecord, FactorTable};
use crate::traits::{Factor, StyleFactor};
use chrono::NaiveDate;
use porto_data::{PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};

/// Configuration for the TransactionAmount factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionAmountConfig {
    /// Month the annual snapshot is taken in (default: January)
    pub snapshot_month: SnapshotMonth,
    /// Trading days per month sizing the windows (default: 21)
    pub trading_days_per_month: u32,
    /// Observations a window needs (default: one)
    pub policy: WindowPolicy,
}

impl Default for TransactionAmountConfig {
    fn default() -> Self {
        Self {
            snapshot_month: SnapshotMonth::JANUARY,
            trading_days_per_month: TRADING_DAYS_PER_MONTH,
            policy: WindowPolicy::MinObservations(1),
        }
    }
}

/// Average transaction amount of one security-year over six horizons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Snapshot date
    pub date: NaiveDate,
    /// 1-month average
    pub avg_transaction_amount_1m: f64,
    /// 3-month average
    pub avg_transaction_amount_3m: f64,
    /// 6-month average
    pub avg_transaction_amount_6m: f64,
    /// 12-month average
    pub avg_transaction_amount_12m: f64,
    /// 24-month average
    pub avg_transaction_amount_24m: f64,
    /// 36-month average
    pub avg_transaction_amount_36m: f64,
}

impl FactorRecord for LiquidityRecord {
    const COLUMNS: &'static [FactorColumn] = &[
        FactorColumn::AvgTransactionAmount1m,
        FactorColumn::AvgTransactionAmount3m,
        FactorColumn::AvgTransactionAmount6m,
        FactorColumn::AvgTransactionAmount12m,
        FactorColumn::AvgTransactionAmount24m,
        FactorColumn::AvgTransactionAmount36m,
    ];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.avg_transaction_amount_1m,
            self.avg_transaction_amount_3m,
            self.avg_transaction_amount_6m,
            self.avg_transaction_amount_12m,
            self.avg_transaction_amount_24m,
            self.avg_transaction_amount_36m,
        ]
    }
}

/// TransactionAmount averages daily traded value over six horizons
#[derive(Debug)]
pub struct TransactionAmountFactor {
    config: TransactionAmountConfig,
}

impl Factor for TransactionAmountFactor {
    type Input<'a> = &'a PanelDataset;
    type Record = LiquidityRecord;

    fn name(&self) -> &str {
        "liquidity"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Liquidity
    }

    fn compute(&self, dataset: &PanelDataset) -> Result<FactorTable<LiquidityRecord>> {
        let windows = HorizonWindows {
            trading_days_per_month: self.config.trading_days_per_month,
            policy: self.config.policy,
            statistic: RollingStatistic::Mean,
        };
        let snapshot = AnnualSnapshot::new(self.config.snapshot_month);
        let samples = windows.sample(dataset, snapshot, |series| {
            series
                .iter()
                .map(|o| o.adj_close_price * o.adj_trading_volume)
                .collect()
        })?;

        FactorTable::from_records(samples.into_iter().map(|s| {
            let [m1, m3, m6, m12, m24, m36] = s.values;
            LiquidityRecord {
                key: s.key,
                date: s.date,
                avg_transaction_amount_1m: m1,
                avg_transaction_amount_3m: m3,
                avg_transaction_amount_6m: m6,
                avg_transaction_amount_12m: m12,
                avg_transaction_amount_24m: m24,
                avg_transaction_amount_36m: m36,
            }
        }))
    }
}

impl StyleFactor for TransactionAmountFactor {
    type Config = TransactionAmountConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for TransactionAmountFactor {
    fn default() -> Self {
        Self::with_config(TransactionAmountConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use porto_data::{DailyObservation, DateRange};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(prices: Vec<DailyObservation>) -> PanelDataset {
        let range = DateRange::new(date(2010, 1, 1), date(2021, 1, 1)).unwrap();
        PanelDataset::new("Korea", range, prices, Vec::new())
    }

    fn trade(d: NaiveDate, price: f64, volume: f64) -> DailyObservation {
        let mut obs = DailyObservation::empty("170", "A", d);
        obs.adj_close_price = price;
        obs.adj_trading_volume = volume;
        obs
    }

    #[test]
    fn test_factor_name() {
        let factor = TransactionAmountFactor::default();
        assert_eq!(factor.name(), "liquidity");
        assert_eq!(factor.category(), FactorCategory::Liquidity);
        assert_eq!(factor.config().policy, WindowPolicy::MinObservations(1));
    }

    #[test]
    fn test_short_history_is_defined() {
        // 19 trading days in December followed by the first January day
        let mut prices: Vec<DailyObservation> = (2..=20)
            .map(|d| trade(date(2019, 12, d), 10.0, 100.0))
            .collect();
        prices.push(trade(date(2020, 1, 2), 20.0, 100.0));
        assert_eq!(prices.len(), 20);

        let table = TransactionAmountFactor::default()
            .compute(&dataset(prices))
            .unwrap();
        let record = table.iter().next().unwrap();
        let expected = (19.0 * 1000.0 + 2000.0) / 20.0;
        assert_relative_eq!(record.avg_transaction_amount_1m, expected);
        assert_relative_eq!(record.avg_transaction_amount_36m, expected);
    }

    #[test]
    fn test_missing_volume_is_skipped() {
        let prices = vec![
            trade(date(2019, 12, 30), 10.0, 100.0),
            trade(date(2019, 12, 31), 10.0, f64::NAN),
            trade(date(2020, 1, 2), 10.0, 300.0),
        ];
        let table = TransactionAmountFactor::default()
            .compute(&dataset(prices))
            .unwrap();
        assert_relative_eq!(table.iter().next().unwrap().avg_transaction_amount_1m, 2000.0);
    }
}
