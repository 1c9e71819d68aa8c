//! CSV and JSON export of regression summaries and factor panels.
//!
//! Missing panel values are written as empty CSV cells and as JSON `null`.

use porto_factors::FactorColumn;
use porto_model::{FactorPanel, RegressionSummary};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-UTF-8 output.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension, defaulting to pretty JSON for
    /// `.json`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::PrettyJson),
            _ => None,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn json(value: &impl Serialize, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

/// The coefficient table: one CSV row per regressor
/// (`factor,coefficient,std_error,t_statistic,p_value`), or the whole summary
/// including fit diagnostics as JSON.
impl Exporter for RegressionSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for estimate in &self.coefficients {
                    wtr.serialize(estimate)?;
                }
                finish(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => json(self, format),
        }
    }
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn panel_records(panel: &FactorPanel) -> Vec<Value> {
    panel
        .iter()
        .map(|(key, row)| {
            let mut record = Map::new();
            record.insert("exchange".into(), Value::from(key.exchange.as_str()));
            record.insert("security_id".into(), Value::from(key.security_id.as_str()));
            record.insert("year".into(), Value::from(key.year));
            for column in FactorColumn::ALL {
                // from_f64 yields None for NaN and infinities
                let value = serde_json::Number::from_f64(row[column.index()])
                    .map_or(Value::Null, Value::Number);
                record.insert(column.name().into(), value);
            }
            Value::Object(record)
        })
        .collect()
}

/// One row per security-year: key columns, then every factor column in panel
/// order.
impl Exporter for FactorPanel {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let header = ["exchange", "security_id", "year"]
                    .into_iter()
                    .chain(FactorColumn::ALL.iter().map(|c| c.name()));
                wtr.write_record(header)?;
                for (key, row) in self.iter() {
                    let mut record = vec![
                        key.exchange.clone(),
                        key.security_id.clone(),
                        key.year.to_string(),
                    ];
                    record.extend(row.iter().map(|v| cell(*v)));
                    wtr.write_record(&record)?;
                }
                finish(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => {
                json(&panel_records(self), format)
            }
        }
    }
}
