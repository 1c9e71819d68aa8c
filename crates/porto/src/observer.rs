//! Stage completion hooks.
//!
//! The pipeline never prints. Every stage ends with a [`StageReport`] handed
//! to a [`PipelineObserver`], which is how an empty join or an over-eager
//! filter becomes visible to the caller.

use porto_factors::FactorCategory;
use std::fmt;

/// A step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Raw price rows fetched
    FetchPrices,
    /// Raw statement rows fetched
    FetchFundamentals,
    /// One factor table computed
    Factor(FactorCategory),
    /// Factor tables joined into the panel
    Merge,
    /// Panel z-scored
    Normalize,
    /// Sparse columns and incomplete rows removed
    Filter,
    /// Regression fitted
    Regression,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchPrices => f.write_str("fetch prices"),
            Self::FetchFundamentals => f.write_str("fetch fundamentals"),
            Self::Factor(category) => write!(f, "{category} factor"),
            Self::Merge => f.write_str("merge"),
            Self::Normalize => f.write_str("normalize"),
            Self::Filter => f.write_str("filter"),
            Self::Regression => f.write_str("regression"),
        }
    }
}

/// Outcome of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    /// Completed stage
    pub stage: Stage,
    /// Rows the stage produced
    pub rows: usize,
}

impl StageReport {
    /// Create a report.
    pub const fn new(stage: Stage, rows: usize) -> Self {
        Self { stage, rows }
    }
}

/// Receives a report after every stage.
pub trait PipelineObserver {
    /// Called once a stage has completed.
    fn on_stage(&mut self, report: &StageReport);
}

/// Ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_stage(&mut self, _report: &StageReport) {}
}

/// Emits a structured `tracing` event per stage.
///
/// Stages producing no rows are logged at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage(&mut self, report: &StageReport) {
        if report.rows == 0 {
            tracing::warn!(stage = %report.stage, rows = report.rows, "stage produced no rows");
        } else {
            tracing::info!(stage = %report.stage, rows = report.rows, "stage complete");
        }
    }
}

/// Collects every report.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    reports: Vec<StageReport>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// Reports in completion order.
    pub fn reports(&self) -> &[StageReport] {
        &self.reports
    }

    /// Take the collected reports.
    pub fn into_reports(self) -> Vec<StageReport> {
        self.reports
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_stage(&mut self, report: &StageReport) {
        self.reports.push(*report);
    }
}

/// Forwards to an inner observer and keeps a copy of every report.
pub(crate) struct Tee<'a> {
    inner: &'a mut dyn PipelineObserver,
    reports: Vec<StageReport>,
}

impl<'a> Tee<'a> {
    pub(crate) fn new(inner: &'a mut dyn PipelineObserver) -> Self {
        Self {
            inner,
            reports: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, rows: usize) {
        self.on_stage(&StageReport::new(stage, rows));
    }

    pub(crate) fn into_reports(self) -> Vec<StageReport> {
        self.reports
    }
}

impl PipelineObserver for Tee<'_> {
    fn on_stage(&mut self, report: &StageReport) {
        self.reports.push(*report);
        self.inner.on_stage(report);
    }
}

impl fmt::Debug for Tee<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tee").field("reports", &self.reports).finish()
    }
}
