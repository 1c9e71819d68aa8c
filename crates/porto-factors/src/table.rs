//! Keyed tables of typed factor records.

use crate::column::FactorColumn;
use crate::error::{FactorError, Result};
use chrono::NaiveDate;
use porto_data::SecurityYear;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// One row of a factor table.
pub trait FactorRecord {
    /// Panel columns this record contributes, in panel order.
    const COLUMNS: &'static [FactorColumn];

    /// Security-year the record describes.
    fn key(&self) -> &SecurityYear;

    /// Observation date the values were taken at.
    fn date(&self) -> NaiveDate;

    /// Values aligned with [`Self::COLUMNS`].
    fn values(&self) -> Vec<f64>;
}

/// Factor records keyed by security-year, at most one per key.
///
/// Iteration follows the key order (exchange, security, year).
#[derive(Debug, Clone)]
pub struct FactorTable<R> {
    rows: BTreeMap<SecurityYear, R>,
}

impl<R> Default for FactorTable<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: FactorRecord> FactorTable<R> {
    /// Build a table, rejecting a second record for the same key.
    pub fn from_records<I: IntoIterator<Item = R>>(records: I) -> Result<Self> {
        let mut rows = BTreeMap::new();
        for record in records {
            match rows.entry(record.key().clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(slot) => return Err(FactorError::DuplicateKey(slot.key().clone())),
            }
        }
        Ok(Self { rows })
    }

    /// Record for `key`, if present.
    pub fn get(&self, key: &SecurityYear) -> Option<&R> {
        self.rows.get(key)
    }

    /// Whether a record exists for `key`.
    pub fn contains_key(&self, key: &SecurityYear) -> bool {
        self.rows.contains_key(key)
    }

    /// Value of `column` for `key`, if the record exists and carries the column.
    pub fn value(&self, key: &SecurityYear, column: FactorColumn) -> Option<f64> {
        let position = R::COLUMNS.iter().position(|c| *c == column)?;
        self.get(key).map(|r| r.values()[position])
    }

    /// Records in key order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &SecurityYear> {
        self.rows.keys()
    }

    /// Panel columns of the records.
    pub const fn columns(&self) -> &'static [FactorColumn] {
        R::COLUMNS
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Probe {
        key: SecurityYear,
        value: f64,
    }

    impl FactorRecord for Probe {
        const COLUMNS: &'static [FactorColumn] = &[FactorColumn::Pbr];

        fn key(&self) -> &SecurityYear {
            &self.key
        }

        fn date(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(self.key.year, 1, 2).unwrap()
        }

        fn values(&self) -> Vec<f64> {
            vec![self.value]
        }
    }

    fn probe(id: &str, year: i32, value: f64) -> Probe {
        Probe {
            key: SecurityYear::new("170", id, year),
            value,
        }
    }

    #[test]
    fn test_records_are_key_ordered() {
        let table = FactorTable::from_records([
            probe("B", 2020, 3.0),
            probe("A", 2021, 2.0),
            probe("A", 2020, 1.0),
        ])
        .unwrap();
        let values: Vec<f64> = table.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns(), &[FactorColumn::Pbr]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = FactorTable::from_records([probe("A", 2020, 1.0), probe("A", 2020, 2.0)])
            .unwrap_err();
        assert!(matches!(err, FactorError::DuplicateKey(key) if key.security_id == "A"));
    }

    #[test]
    fn test_value_lookup() {
        let table = FactorTable::from_records([probe("A", 2020, 1.5)]).unwrap();
        let key = SecurityYear::new("170", "A", 2020);
        assert_eq!(table.value(&key, FactorColumn::Pbr), Some(1.5));
        assert_eq!(table.value(&key, FactorColumn::Psr), None);
        assert!(!table.contains_key(&SecurityYear::new("170", "A", 2021)));
    }
}
