//! Calendar Momentum Factor
//!
//! Every month of a security is represented by its first observed trading
//! day. For a snapshot month `m` the lookback and forward months are found
//! by calendar arithmetic and resolved by exact lookup; the security-year is
//! dropped if any of them has no observation. Gaps are never interpolated.

use crate::calendar::MonthlyIndex;
use crate::column::FactorColumn;
use crate::error::Result;
use crate::registry::FactorCategory;
use crate::snapshot::{AnnualSnapshot, SnapshotMonth};
use crate::table::{FactorRecord, FactorTable};
use crate::traits::{Factor, StyleFactor};
use chrono::NaiveDate;
use porto_data::{DailyObservation, PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lookback horizons in months.
pub const LOOKBACK_MONTHS: [u32; 5] = [1, 6, 12, 24, 36];

/// Horizon of the forward return in months.
pub const FORWARD_MONTHS: u32 = 12;

const OFFSETS: [i32; 6] = [-1, -6, -12, -24, -36, FORWARD_MONTHS as i32];

/// Configuration for the CalendarMomentum factor
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarMomentumConfig {
    /// Month the annual snapshot is taken in (default: January)
    pub snapshot_month: SnapshotMonth,
}

/// Past and forward price changes of one security-year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumRecord {
    /// Security-year
    pub key: SecurityYear,
    /// Month-start date the changes are measured from
    pub date: NaiveDate,
    /// Change since one month earlier
    pub momentum_1m: f64,
    /// Change since six months earlier
    pub momentum_6m: f64,
    /// Change since twelve months earlier
    pub momentum_12m: f64,
    /// Change since twenty-four months earlier
    pub momentum_24m: f64,
    /// Change since thirty-six months earlier
    pub momentum_36m: f64,
    /// Change over the following twelve months
    pub return_1y_later: f64,
}

impl FactorRecord for MomentumRecord {
    const COLUMNS: &'static [FactorColumn] = &[
        FactorColumn::Momentum1m,
        FactorColumn::Momentum6m,
        FactorColumn::Momentum12m,
        FactorColumn::Momentum24m,
        FactorColumn::Momentum36m,
        FactorColumn::Return1yLater,
    ];

    fn key(&self) -> &SecurityYear {
        &self.key
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.momentum_1m,
            self.momentum_6m,
            self.momentum_12m,
            self.momentum_24m,
            self.momentum_36m,
            self.return_1y_later,
        ]
    }
}

/// CalendarMomentum measures price changes between month-start dates
#[derive(Debug)]
pub struct CalendarMomentumFactor {
    config: CalendarMomentumConfig,
}

impl CalendarMomentumFactor {
    /// Month-start rows of the snapshot month whose offsets all resolve,
    /// paired with the adjusted close at each offset.
    fn resolve_series<'a>(
        &self,
        series: &'a [DailyObservation],
    ) -> Vec<(&'a DailyObservation, [f64; 6])> {
        let by_date: HashMap<NaiveDate, &DailyObservation> =
            series.iter().map(|o| (o.date, o)).collect();
        let index = MonthlyIndex::new(series.iter().map(|o| o.date));
        let month = self.config.snapshot_month;

        let mut resolved = Vec::new();
        for (current, start) in index.iter() {
            if current.month() != month.number() {
                continue;
            }
            let Some(targets) = index.resolve(current, &OFFSETS) else {
                continue;
            };
            let Some(row) = by_date.get(&start) else {
                continue;
            };
            if let Some(closes) = closes_on(&by_date, &targets) {
                resolved.push((*row, closes));
            }
        }
        resolved
    }
}

fn closes_on(
    by_date: &HashMap<NaiveDate, &DailyObservation>,
    dates: &[NaiveDate; 6],
) -> Option<[f64; 6]> {
    let mut closes = [f64::NAN; 6];
    for (slot, date) in closes.iter_mut().zip(dates) {
        *slot = by_date.get(date)?.adj_close_price;
    }
    Some(closes)
}

impl Factor for CalendarMomentumFactor {
    type Input<'a> = &'a PanelDataset;
    type Record = MomentumRecord;

    fn name(&self) -> &str {
        "momentum"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Momentum
    }

    fn compute(&self, dataset: &PanelDataset) -> Result<FactorTable<MomentumRecord>> {
        let candidates: Vec<_> = dataset
            .price_series()
            .flat_map(|series| self.resolve_series(series))
            .collect();

        AnnualSnapshot::new(self.config.snapshot_month).extract(candidates, |key, (row, p)| {
            let now = row.adj_close_price;
            let change = |past: f64| (now - past) / past;
            MomentumRecord {
                key,
                date: row.date,
                momentum_1m: change(p[0]),
                momentum_6m: change(p[1]),
                momentum_12m: change(p[2]),
                momentum_24m: change(p[3]),
                momentum_36m: change(p[4]),
                return_1y_later: (p[5] - now) / now,
            }
        })
    }
}

impl StyleFactor for CalendarMomentumFactor {
    type Config = CalendarMomentumConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for CalendarMomentumFactor {
    fn default() -> Self {
        Self::with_config(CalendarMomentumConfig::default())
    }
}
