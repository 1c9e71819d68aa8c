//! Historical Volatility Factor
//!
//! Daily simple returns of the adjusted close, rolled with a full-window
//! policy: a horizon is only defined once its whole window holds returns.
//! A missing close carries the previous one forward, so it costs a single
//! zero return rather than a hole in every window covering it.

use crate::column::FactorColumn;
use crate::error::Result;
use crate::registry::FactorCategory;
use crate::rolling::{
    HorizonWindows, RollingStatistic, TRADING_DAYS_PER_MONTH, WindowPolicy, pct_change,
};
use crate::snapshot::{AnnualSnapshot, SnapshotMonth};
use crate::table::{FactorRecord, FactorTable};
use crate::traits::{Factor, StyleFactor};
use chrono::NaiveDate;
use porto_data::{PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};

/// Configuration for the HistoricalVolatility factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalVolatilityConfig {
    /// Month the annual snapshot is taken in (default: January)
    pub snapshot_month: SnapshotMonth,
    /// Trading days per month sizing the windows (default: 21)
    pub trading_days_per_month: u32,
    /// Observations a window needs (default: the full window)
    pub policy: WindowPolicy,
}

impl Default for HistoricalVolatilityConfig {
    fn default() -> Self {
        Self {
            snapshot_month: SnapshotMonth::JANUARY,
            trading_days_per_month: TRADING_DAYS_PER_MONTH,
            policy: WindowPolicy::FullWindow,
        }
    }
}

/// Return volatility of one security-year over six horizons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Snapshot date
    pub date: NaiveDate,
    /// 1-month volatility
    pub daily_vol_1m: f64,
    /// 3-month volatility
    pub daily_vol_3m: f64,
    /// 6-month volatility
    pub daily_vol_6m: f64,
    /// 12-month volatility
    pub daily_vol_12m: f64,
    /// 24-month volatility
    pub daily_vol_24m: f64,
    /// 36-month volatility
    pub daily_vol_36m: f64,
}

impl FactorRecord for VolatilityRecord {
    const COLUMNS: &'static [FactorColumn] = &[
        FactorColumn::DailyVol1m,
        FactorColumn::DailyVol3m,
        FactorColumn::DailyVol6m,
        FactorColumn::DailyVol12m,
        FactorColumn::DailyVol24m,
        FactorColumn::DailyVol36m,
    ];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.daily_vol_1m,
            self.daily_vol_3m,
            self.daily_vol_6m,
            self.daily_vol_12m,
            self.daily_vol_24m,
            self.daily_vol_36m,
        ]
    }
}

/// Simple returns against the last non-missing close; the first return is missing.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    pct_change(prices)
}

/// HistoricalVolatility computes rolling return volatility over six horizons
#[derive(Debug)]
pub struct HistoricalVolatilityFactor {
    config: HistoricalVolatilityConfig,
}

impl Factor for HistoricalVolatilityFactor {
    type Input<'a> = &'a PanelDataset;
    type Record = VolatilityRecord;

    fn name(&self) -> &str {
        "volatility"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Volatility
    }

    fn compute(&self, dataset: &PanelDataset) -> Result<FactorTable<VolatilityRecord>> {
        let windows = HorizonWindows {
            trading_days_per_month: self.config.trading_days_per_month,
            policy: self.config.policy,
            statistic: RollingStatistic::StdDev,
        };
        let snapshot = AnnualSnapshot::new(self.config.snapshot_month);
        let samples = windows.sample(dataset, snapshot, |series| {
            let closes: Vec<f64> = series.iter().map(|o| o.adj_close_price).collect();
            daily_returns(&closes)
        })?;

        FactorTable::from_records(samples.into_iter().map(|s| {
            let [m1, m3, m6, m12, m24, m36] = s.values;
            VolatilityRecord {
                key: s.key,
                date: s.date,
                daily_vol_1m: m1,
                daily_vol_3m: m3,
                daily_vol_6m: m6,
                daily_vol_12m: m12,
                daily_vol_24m: m24,
                daily_vol_36m: m36,
            }
        }))
    }
}

impl StyleFactor for HistoricalVolatilityFactor {
    type Config = HistoricalVolatilityConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for HistoricalVolatilityFactor {
    fn default() -> Self {
        Self::with_config(HistoricalVolatilityConfig::default())
    }
}
