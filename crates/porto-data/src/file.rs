//! CSV-file backed provider.

use crate::error::{DataError, Result};
use crate::provider::{MarketDataProvider, filter_fundamentals, filter_prices};
use crate::range::DateRange;
use crate::types::{DailyObservation, Fundamental};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads price and statement rows from two CSV files.
///
/// Headers are the field names of [`DailyObservation`] and [`Fundamental`].
/// Empty numeric cells read as missing values.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    prices_path: PathBuf,
    fundamentals_path: PathBuf,
}

impl CsvProvider {
    /// Create a provider over the two files.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(prices_path: P, fundamentals_path: Q) -> Self {
        Self {
            prices_path: prices_path.as_ref().to_path_buf(),
            fundamentals_path: fundamentals_path.as_ref().to_path_buf(),
        }
    }
}

impl MarketDataProvider for CsvProvider {
    fn fetch_prices(
        &self,
        exchanges: &[String],
        range: &DateRange,
    ) -> Result<Vec<DailyObservation>> {
        let rows = read_prices(std::fs::File::open(&self.prices_path)?)?;
        Ok(filter_prices(rows.into_iter(), exchanges, range))
    }

    fn fetch_fundamentals(
        &self,
        exchanges: &[String],
        range: &DateRange,
    ) -> Result<Vec<Fundamental>> {
        let rows = read_fundamentals(std::fs::File::open(&self.fundamentals_path)?)?;
        Ok(filter_fundamentals(rows.into_iter(), exchanges, range))
    }
}

/// Parse price rows from CSV text.
pub fn read_prices<R: Read>(reader: R) -> Result<Vec<DailyObservation>> {
    read_records(reader, "prices", DailyObservation::REQUIRED_COLUMNS)
}

/// Parse statement rows from CSV text.
pub fn read_fundamentals<R: Read>(reader: R) -> Result<Vec<Fundamental>> {
    read_records(reader, "fundamentals", Fundamental::REQUIRED_COLUMNS)
}

fn read_records<R: Read, T: DeserializeOwned>(
    reader: R,
    table: &str,
    required: &[&str],
) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Validate up front so a missing column is reported by name rather than
    // as a deserialization failure on the first row.
    let headers = reader.headers()?.clone();
    if let Some(column) = required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(DataError::missing_column(table, column));
    }

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(records)
}
