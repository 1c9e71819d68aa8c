#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/porto/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod exchange;
pub mod file;
pub mod frame;
pub mod provider;
pub mod range;
pub mod sqlite;
pub mod types;

pub use dataset::PanelDataset;
pub use error::{DataError, Result};
pub use exchange::{ExchangeEntry, ExchangeMap};
pub use file::CsvProvider;
pub use frame::{fundamentals_from_frame, prices_from_frame};
pub use provider::{InMemoryProvider, MarketDataProvider, load_dataset};
pub use range::DateRange;
pub use sqlite::{RawPriceRow, RawStatementRow, SqliteProvider};
pub use types::{DailyObservation, Fundamental, SecurityKey, SecurityYear};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
