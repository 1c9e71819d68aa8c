//! Exchange-code to country lookup table.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// One row of the exchange lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEntry {
    /// Exchange code as used by the price and statement rows
    pub exchange: String,
    /// Country the exchange is listed in
    pub country: String,
}

/// Mapping from exchange codes to countries.
#[derive(Debug, Clone, Default)]
pub struct ExchangeMap {
    entries: Vec<ExchangeEntry>,
}

impl ExchangeMap {
    const COLUMNS: &'static [&'static str] = &["exchange", "country"];

    /// Create a mapping from explicit entries.
    pub const fn from_entries(entries: Vec<ExchangeEntry>) -> Self {
        Self { entries }
    }

    /// Load a mapping from a CSV file with `exchange,country` headers.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load a mapping from CSV text with `exchange,country` headers.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        for column in Self::COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(DataError::missing_column("exchange map", column));
            }
        }
        let entries = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ExchangeEntry>, _>>()?;
        Ok(Self { entries })
    }

    /// All entries.
    pub fn entries(&self) -> &[ExchangeEntry] {
        &self.entries
    }

    /// Exchange codes listed in `country`, sorted and deduplicated.
    pub fn exchanges_for(&self, country: &str) -> Result<Vec<String>> {
        let exchanges: BTreeSet<&str> = self
            .entries
            .iter()
            .filter(|e| e.country == country)
            .map(|e| e.exchange.as_str())
            .collect();
        if exchanges.is_empty() {
            return Err(DataError::UnknownCountry(country.to_string()));
        }
        Ok(exchanges.into_iter().map(str::to_string).collect())
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let countries: BTreeSet<&str> = self.entries.iter().map(|e| e.country.as_str()).collect();
        countries.into_iter().collect()
    }
}
