//! End-to-end run: factors, merge, normalization, filtering and regression.

use crate::config::PipelineConfig;
use crate::engine::FactorEngine;
use crate::error::Result;
use crate::observer::{PipelineObserver, Stage, StageReport, Tee};
use porto_data::{DateRange, ExchangeMap, MarketDataProvider, PanelDataset};
use porto_model::{
    CrossSectionalNormalizer, FactorMerger, FactorPanel, OlsFit, OlsRegressor, RegressionSummary,
};
use std::fmt;

/// Row counts of every completed stage, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Completed stages
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    /// Rows produced by `stage`, if it ran.
    pub fn rows(&self, stage: Stage) -> Option<usize> {
        self.stages.iter().find(|r| r.stage == stage).map(|r| r.rows)
    }

    /// The first stage that produced no rows.
    pub fn first_empty(&self) -> Option<Stage> {
        self.stages.iter().find(|r| r.rows == 0).map(|r| r.stage)
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.stages {
            writeln!(f, "  {:<22} {:>10} rows", report.stage.to_string(), report.rows)?;
        }
        Ok(())
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The normalized panel, before missing-value filtering
    pub panel: FactorPanel,
    /// The fitted regression
    pub fit: OlsFit,
    /// Row counts per stage
    pub report: PipelineReport,
}

impl Analysis {
    /// Coefficient table and diagnostics.
    pub const fn summary(&self) -> &RegressionSummary {
        &self.fit.summary
    }
}

/// Run every stage after data acquisition on `dataset`.
pub fn run_pipeline(
    dataset: &PanelDataset,
    config: &PipelineConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<Analysis> {
    let mut tee = Tee::new(observer);
    let (panel, fit) = execute(dataset, config, &mut tee)?;
    Ok(Analysis {
        panel,
        fit,
        report: PipelineReport {
            stages: tee.into_reports(),
        },
    })
}

/// Fetch the data of every exchange of `country` from `provider`, then run
/// the pipeline.
pub fn analyze_country<P: MarketDataProvider + ?Sized>(
    provider: &P,
    map: &ExchangeMap,
    country: &str,
    range: DateRange,
    config: &PipelineConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<Analysis> {
    config.validate()?;
    let exchanges = map.exchanges_for(country)?;

    let mut tee = Tee::new(observer);
    let prices = provider.fetch_prices(&exchanges, &range)?;
    tee.record(Stage::FetchPrices, prices.len());
    let fundamentals = provider.fetch_fundamentals(&exchanges, &range)?;
    tee.record(Stage::FetchFundamentals, fundamentals.len());

    let dataset = PanelDataset::new(country, range, prices, fundamentals);
    let (panel, fit) = execute(&dataset, config, &mut tee)?;
    Ok(Analysis {
        panel,
        fit,
        report: PipelineReport {
            stages: tee.into_reports(),
        },
    })
}

fn execute(
    dataset: &PanelDataset,
    config: &PipelineConfig,
    tee: &mut Tee<'_>,
) -> Result<(FactorPanel, OlsFit)> {
    config.validate()?;
    let filter = config.filter()?;

    let tables = FactorEngine::new(config).compute_all(dataset, tee)?;

    let mut panel = FactorMerger.merge(&tables);
    tee.record(Stage::Merge, panel.len());

    CrossSectionalNormalizer.normalize(&mut panel);
    tee.record(Stage::Normalize, panel.len());

    let design = filter.apply(&panel)?;
    tee.record(Stage::Filter, design.observations());

    let fit = OlsRegressor.fit(&design)?;
    tee.record(Stage::Regression, fit.summary.observations);

    Ok((panel, fit))
}
