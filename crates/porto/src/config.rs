//! Pipeline configuration.

use crate::error::{PortoError, Result};
use porto_factors::rolling::TRADING_DAYS_PER_MONTH;
use porto_factors::{
    CalendarMomentumConfig, DividendConfig, HistoricalVolatilityConfig, MarketCapConfig,
    QualityConfig, SnapshotMonth, TransactionAmountConfig,
};
use porto_model::SignificanceFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on trading days per month (days in the longest month).
pub const MAX_TRADING_DAYS_PER_MONTH: u32 = 31;

/// Parameters of one pipeline run.
///
/// Missing fields take their defaults when read from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Month the annual snapshot is taken in (default: January)
    pub snapshot_month: SnapshotMonth,
    /// Years between a fiscal year and the panel year its statement joins (default: 2)
    pub disclosure_lag: i32,
    /// Trading days per month sizing the rolling windows (default: 21)
    pub trading_days_per_month: u32,
    /// Missing share at which a panel column is dropped (default: 0.20)
    pub max_missing_fraction: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            snapshot_month: SnapshotMonth::JANUARY,
            disclosure_lag: 2,
            trading_days_per_month: TRADING_DAYS_PER_MONTH,
            max_missing_fraction: SignificanceFilter::default().max_missing_fraction,
        }
    }
}

impl PipelineConfig {
    /// Read a configuration from a JSON file.
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check every parameter before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.disclosure_lag < 0 {
            return Err(PortoError::Config(format!(
                "disclosure lag must not be negative, got {}",
                self.disclosure_lag
            )));
        }
        if !(1..=MAX_TRADING_DAYS_PER_MONTH).contains(&self.trading_days_per_month) {
            return Err(PortoError::Config(format!(
                "trading days per month must be between 1 and {MAX_TRADING_DAYS_PER_MONTH}, got {}",
                self.trading_days_per_month
            )));
        }
        self.filter()?;
        Ok(())
    }

    /// The missing-value filter.
    pub fn filter(&self) -> Result<SignificanceFilter> {
        Ok(SignificanceFilter::new(self.max_missing_fraction)?)
    }

    pub(crate) const fn size(&self) -> MarketCapConfig {
        MarketCapConfig {
            snapshot_month: self.snapshot_month,
        }
    }

    pub(crate) const fn quality(&self) -> QualityConfig {
        QualityConfig {
            disclosure_lag: self.disclosure_lag,
        }
    }

    pub(crate) const fn dividend(&self) -> DividendConfig {
        DividendConfig {
            snapshot_month: self.snapshot_month,
        }
    }

    pub(crate) fn volatility(&self) -> HistoricalVolatilityConfig {
        HistoricalVolatilityConfig {
            snapshot_month: self.snapshot_month,
            trading_days_per_month: self.trading_days_per_month,
            ..Default::default()
        }
    }

    pub(crate) fn liquidity(&self) -> TransactionAmountConfig {
        TransactionAmountConfig {
            snapshot_month: self.snapshot_month,
            trading_days_per_month: self.trading_days_per_month,
            ..Default::default()
        }
    }

    pub(crate) const fn momentum(&self) -> CalendarMomentumConfig {
        CalendarMomentumConfig {
            snapshot_month: self.snapshot_month,
        }
    }
}
