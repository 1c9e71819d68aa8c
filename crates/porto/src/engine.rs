//! Runs the eight factor calculators over one dataset.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::observer::{PipelineObserver, Stage, StageReport};
use porto_data::PanelDataset;
use porto_factors::{
    CalendarMomentumFactor, DividendFactor, Factor, FactorTable,
    HistoricalVolatilityFactor, MarketCapFactor, PriceRatioFactor, QualityFactor,
    StatementGrowthFactor, StyleFactor, TransactionAmountFactor,
};
use porto_model::FactorTables;

/// Holds one configured calculator per factor.
///
/// Value reads the quality and size tables and growth reads the quality
/// table, so those three run in dependency order. Everything else reads the
/// dataset alone.
#[derive(Debug)]
pub struct FactorEngine {
    size: MarketCapFactor,
    quality: QualityFactor,
    value: PriceRatioFactor,
    dividend: DividendFactor,
    volatility: HistoricalVolatilityFactor,
    liquidity: TransactionAmountFactor,
    growth: StatementGrowthFactor,
    momentum: CalendarMomentumFactor,
}

impl Default for FactorEngine {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl FactorEngine {
    /// Create the calculators for `config`.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            size: MarketCapFactor::with_config(config.size()),
            quality: QualityFactor::with_config(config.quality()),
            value: PriceRatioFactor,
            dividend: DividendFactor::with_config(config.dividend()),
            volatility: HistoricalVolatilityFactor::with_config(config.volatility()),
            liquidity: TransactionAmountFactor::with_config(config.liquidity()),
            growth: StatementGrowthFactor,
            momentum: CalendarMomentumFactor::with_config(config.momentum()),
        }
    }

    /// Names of the calculators, in panel order.
    pub fn available_factors(&self) -> Vec<&str> {
        vec![
            self.size.name(),
            self.quality.name(),
            self.value.name(),
            self.dividend.name(),
            self.volatility.name(),
            self.liquidity.name(),
            self.growth.name(),
            self.momentum.name(),
        ]
    }

    /// Compute every factor table, reporting each one as it completes.
    pub fn compute_all(
        &self,
        dataset: &PanelDataset,
        observer: &mut dyn PipelineObserver,
    ) -> Result<FactorTables> {
        let size = run(&self.size, dataset, observer)?;
        let quality = run(&self.quality, dataset, observer)?;
        let value = run(&self.value, (&quality, &size), observer)?;
        let dividend = run(&self.dividend, dataset, observer)?;
        let volatility = run(&self.volatility, dataset, observer)?;
        let liquidity = run(&self.liquidity, dataset, observer)?;
        let growth = run(&self.growth, &quality, observer)?;
        let momentum = run(&self.momentum, dataset, observer)?;

        Ok(FactorTables {
            size,
            quality,
            value,
            dividend,
            volatility,
            liquidity,
            growth,
            momentum,
        })
    }
}

fn run<'a, F: Factor>(
    factor: &F,
    input: F::Input<'a>,
    observer: &mut dyn PipelineObserver,
) -> Result<FactorTable<F::Record>> {
    let table = factor.compute(input)?;
    observer.on_stage(&StageReport::new(Stage::Factor(factor.category()), table.len()));
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use porto_data::{DateRange, PanelDataset};
    use porto_factors::FactorCategory;

    #[test]
    fn test_available_factors() {
        let engine = FactorEngine::default();
        assert_eq!(
            engine.available_factors(),
            vec![
                "size",
                "quality",
                "value",
                "yield",
                "volatility",
                "liquidity",
                "growth",
                "momentum"
            ]
        );
    }

    #[test]
    fn test_empty_dataset_reports_every_factor() {
        let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let dataset = PanelDataset::new(
            "Korea",
            DateRange::new(start, end).unwrap(),
            Vec::new(),
            Vec::new(),
        );

        let mut recorder = RecordingObserver::new();
        let tables = FactorEngine::default()
            .compute_all(&dataset, &mut recorder)
            .unwrap();

        assert!(tables.size.is_empty());
        let stages: Vec<Stage> = recorder.reports().iter().map(|r| r.stage).collect();
        let expected: Vec<Stage> = FactorCategory::ALL.into_iter().map(Stage::Factor).collect();
        assert_eq!(stages, expected);
        assert!(recorder.reports().iter().all(|r| r.rows == 0));
    }
}
