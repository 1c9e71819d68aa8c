//! Trailing windows over per-security daily series.
//!
//! Statistics are evaluated directly over the values a window holds when
//! they are requested, so no rounding error carries over between positions.

use crate::error::{FactorError, Result};
use crate::snapshot::AnnualSnapshot;
use chrono::NaiveDate;
use porto_data::{DailyObservation, PanelDataset, SecurityYear};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Horizons, in months, of the volatility and liquidity windows.
pub const WINDOW_MONTHS: [u32; 6] = [1, 3, 6, 12, 24, 36];

/// Trading days assumed per calendar month.
pub const TRADING_DAYS_PER_MONTH: u32 = 21;

/// Window length in trading days for a horizon of `months`.
///
/// Saturates instead of overflowing.
pub const fn window_length(months: u32, trading_days_per_month: u32) -> usize {
    (trading_days_per_month as usize)
        .saturating_mul(months as usize)
        .saturating_add(1)
}

/// When a window holds enough observations to yield a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowPolicy {
    /// Every position of the window must hold a non-missing value.
    FullWindow,
    /// At least this many non-missing values.
    MinObservations(usize),
}

impl WindowPolicy {
    /// Minimum non-missing values for a window of `length`.
    pub const fn required(self, length: usize) -> usize {
        match self {
            Self::FullWindow => length,
            Self::MinObservations(n) => n,
        }
    }
}

/// Statistic computed over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingStatistic {
    /// Arithmetic mean
    Mean,
    /// Sample standard deviation (one degree of freedom)
    StdDev,
}

/// Bounded ring buffer over the most recent `length` values.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    length: usize,
    policy: WindowPolicy,
    values: VecDeque<f64>,
    present: usize,
}

impl RollingWindow {
    /// Create an empty window of `length` positions (at least one).
    pub fn new(length: usize, policy: WindowPolicy) -> Self {
        let length = length.max(1);
        Self {
            length,
            policy,
            values: VecDeque::with_capacity(length.min(4096)),
            present: 0,
        }
    }

    /// Window length in positions.
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Push the next value, evicting the oldest once the window is full.
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.length {
            if let Some(old) = self.values.pop_front() {
                if !old.is_nan() {
                    self.present -= 1;
                }
            }
        }
        if !value.is_nan() {
            self.present += 1;
        }
        self.values.push_back(value);
    }

    /// Number of non-missing values currently held.
    pub const fn observations(&self) -> usize {
        self.present
    }

    /// Whether the window satisfies its policy.
    pub const fn is_ready(&self) -> bool {
        is_ready(self.policy, self.length, self.present)
    }

    /// Mean of the non-missing values, `NaN` while not ready.
    pub fn mean(&self) -> f64 {
        self.statistic(RollingStatistic::Mean)
    }

    /// Sample standard deviation, `NaN` while not ready or with fewer than two values.
    pub fn std_dev(&self) -> f64 {
        self.statistic(RollingStatistic::StdDev)
    }

    /// Value of `statistic` over the current window.
    pub fn statistic(&self, statistic: RollingStatistic) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        evaluate(self.values.iter().copied(), self.present, statistic)
    }
}

const fn is_ready(policy: WindowPolicy, length: usize, present: usize) -> bool {
    present >= policy.required(length) && present > 0
}

/// Two-pass mean or sample std over the non-missing values of `window`.
fn evaluate(
    window: impl Iterator<Item = f64> + Clone,
    present: usize,
    statistic: RollingStatistic,
) -> f64 {
    let n = present as f64;
    let mean = window.clone().filter(|v| !v.is_nan()).sum::<f64>() / n;
    match statistic {
        RollingStatistic::Mean => mean,
        RollingStatistic::StdDev if present < 2 => f64::NAN,
        RollingStatistic::StdDev => {
            let ss: f64 = window
                .filter(|v| !v.is_nan())
                .map(|v| (v - mean).powi(2))
                .sum();
            (ss / (n - 1.0)).sqrt()
        }
    }
}

/// Trailing statistic of the window of `length` ending at position `end`.
pub fn trailing_statistic(
    values: &[f64],
    end: usize,
    length: usize,
    policy: WindowPolicy,
    statistic: RollingStatistic,
) -> f64 {
    let Some(upto) = values.get(..=end) else {
        return f64::NAN;
    };
    let length = length.max(1);
    let window = &upto[upto.len().saturating_sub(length)..];
    let present = window.iter().filter(|v| !v.is_nan()).count();
    if !is_ready(policy, length, present) {
        return f64::NAN;
    }
    evaluate(window.iter().copied(), present, statistic)
}

/// Trailing statistic at every position of `values`.
pub fn rolling_statistic(
    values: &[f64],
    length: usize,
    policy: WindowPolicy,
    statistic: RollingStatistic,
) -> Vec<f64> {
    let mut window = RollingWindow::new(length, policy);
    values
        .iter()
        .map(|&v| {
            window.push(v);
            window.statistic(statistic)
        })
        .collect()
}

/// Percentage change against the last non-missing value.
///
/// A missing value carries the last one forward and so yields a zero
/// change; values before the first non-missing one stay missing.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut last = f64::NAN;
    values
        .iter()
        .map(|&v| {
            let current = if v.is_nan() { last } else { v };
            let change = current / last - 1.0;
            last = current;
            change
        })
        .collect()
}

/// One trailing statistic evaluated over every horizon of [`WINDOW_MONTHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizonWindows {
    /// Trading days per month used to size the windows
    pub trading_days_per_month: u32,
    /// Policy applied to every window
    pub policy: WindowPolicy,
    /// Statistic computed over every window
    pub statistic: RollingStatistic,
}

/// Horizon statistics of one security-year at its snapshot date.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonSample {
    /// Security-year
    pub key: SecurityYear,
    /// Snapshot date
    pub date: NaiveDate,
    /// One value per horizon, in [`WINDOW_MONTHS`] order
    pub values: [f64; 6],
}

impl HorizonWindows {
    /// Window length of every horizon.
    pub fn lengths(&self) -> [usize; 6] {
        WINDOW_MONTHS.map(|months| window_length(months, self.trading_days_per_month))
    }

    /// Roll `derive(series)` of every security and sample it at the snapshot.
    ///
    /// `derive` must return one value per observation of the series.
    pub fn sample<F>(
        &self,
        dataset: &PanelDataset,
        snapshot: AnnualSnapshot,
        derive: F,
    ) -> Result<Vec<HorizonSample>>
    where
        F: Fn(&[DailyObservation]) -> Vec<f64>,
    {
        if self.trading_days_per_month == 0 {
            return Err(FactorError::InvalidConfig(
                "trading days per month must be positive".to_string(),
            ));
        }
        let lengths = self.lengths();
        let mut samples = Vec::new();
        for series in dataset.price_series() {
            let values = derive(series);
            let picked = snapshot.select(series.iter().zip(0..values.len()));
            samples.extend(picked.into_iter().map(|(key, (obs, i))| HorizonSample {
                key,
                date: obs.date,
                values: lengths.map(|length| {
                    trailing_statistic(&values, i, length, self.policy, self.statistic)
                }),
            }));
        }
        Ok(samples)
    }
}
