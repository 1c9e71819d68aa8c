#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/porto/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod pipeline;

// Re-export main types from sub-crates
pub use porto_data as data;
pub use porto_factors as factors;
pub use porto_model as model;
pub use porto_output as output;

pub use config::{MAX_TRADING_DAYS_PER_MONTH, PipelineConfig};
pub use engine::FactorEngine;
pub use error::{PortoError, Result};
pub use observer::{
    NoopObserver, PipelineObserver, RecordingObserver, Stage, StageReport, TracingObserver,
};
pub use pipeline::{Analysis, PipelineReport, analyze_country, run_pipeline};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
