//! Annual sampling of daily or monthly series.
//!
//! Every price-based factor is observed once a year: the earliest row of
//! each security-year that falls into the snapshot month.

use crate::error::{FactorError, Result};
use crate::table::{FactorRecord, FactorTable};
use chrono::{Datelike, NaiveDate};
use porto_data::{DailyObservation, SecurityYear};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Calendar month in which annual snapshots are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SnapshotMonth(u32);

impl SnapshotMonth {
    /// January, the month every annual factor is sampled in by default.
    pub const JANUARY: Self = Self(1);

    /// Create a snapshot month from its number (1 to 12).
    pub fn new(month: u32) -> Result<Self> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(FactorError::InvalidConfig(format!(
                "snapshot month must be between 1 and 12, got {month}"
            )))
        }
    }

    /// Month number.
    pub const fn number(self) -> u32 {
        self.0
    }

    /// Whether `date` falls into this month.
    pub fn contains(self, date: NaiveDate) -> bool {
        date.month() == self.0
    }
}

impl Default for SnapshotMonth {
    fn default() -> Self {
        Self::JANUARY
    }
}

impl TryFrom<u32> for SnapshotMonth {
    type Error = FactorError;

    fn try_from(month: u32) -> Result<Self> {
        Self::new(month)
    }
}

impl From<SnapshotMonth> for u32 {
    fn from(month: SnapshotMonth) -> Self {
        month.0
    }
}

/// A dated row of one security.
pub trait Observation {
    /// Exchange code.
    fn exchange(&self) -> &str;

    /// Security identifier.
    fn security_id(&self) -> &str;

    /// Observation date.
    fn date(&self) -> NaiveDate;
}

impl Observation for DailyObservation {
    fn exchange(&self) -> &str {
        &self.exchange
    }

    fn security_id(&self) -> &str {
        &self.security_id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn exchange(&self) -> &str {
        (**self).exchange()
    }

    fn security_id(&self) -> &str {
        (**self).security_id()
    }

    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// An observation paired with values derived from its series.
impl<O: Observation, V> Observation for (O, V) {
    fn exchange(&self) -> &str {
        self.0.exchange()
    }

    fn security_id(&self) -> &str {
        self.0.security_id()
    }

    fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

/// Selects the earliest snapshot-month row per security-year.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnualSnapshot {
    month: SnapshotMonth,
}

impl AnnualSnapshot {
    /// Create an extractor for the given month.
    pub const fn new(month: SnapshotMonth) -> Self {
        Self { month }
    }

    /// Month the extractor samples.
    pub const fn month(&self) -> SnapshotMonth {
        self.month
    }

    /// Earliest in-month row of every security-year, in key order.
    ///
    /// Security-years without a row in the snapshot month are absent. Input
    /// order does not matter.
    pub fn select<T, I>(&self, rows: I) -> BTreeMap<SecurityYear, T>
    where
        T: Observation,
        I: IntoIterator<Item = T>,
    {
        let mut picked: BTreeMap<SecurityYear, T> = BTreeMap::new();
        for row in rows {
            let date = row.date();
            if !self.month.contains(date) {
                continue;
            }
            let key = SecurityYear::new(row.exchange(), row.security_id(), date.year());
            match picked.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(mut slot) => {
                    if date < slot.get().date() {
                        slot.insert(row);
                    }
                }
            }
        }
        picked
    }

    /// Select snapshot rows and project each into a factor record.
    pub fn extract<T, I, R, F>(&self, rows: I, mut project: F) -> Result<FactorTable<R>>
    where
        T: Observation,
        I: IntoIterator<Item = T>,
        R: FactorRecord,
        F: FnMut(SecurityYear, T) -> R,
    {
        FactorTable::from_records(
            self.select(rows)
                .into_iter()
                .map(|(key, row)| project(key, row)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(id: &str, d: NaiveDate, cap: f64) -> DailyObservation {
        let mut obs = DailyObservation::empty("170", id, d);
        obs.market_capitalization = cap;
        obs
    }

    #[test]
    fn test_snapshot_month_bounds() {
        assert!(SnapshotMonth::new(0).is_err());
        assert!(SnapshotMonth::new(13).is_err());
        assert_eq!(SnapshotMonth::new(12).unwrap().number(), 12);
        assert_eq!(SnapshotMonth::default(), SnapshotMonth::JANUARY);
    }

    #[test]
    fn test_earliest_january_row_wins() {
        let rows = vec![
            row("A", date(2020, 1, 6), 3.0),
            row("A", date(2019, 12, 30), 9.0),
            row("A", date(2020, 1, 2), 1.0),
            row("A", date(2020, 1, 3), 2.0),
            row("A", date(2020, 2, 3), 4.0),
        ];
        let picked = AnnualSnapshot::default().select(rows.iter());
        assert_eq!(picked.len(), 1);
        let chosen = picked[&SecurityYear::new("170", "A", 2020)];
        assert_eq!(chosen.date, date(2020, 1, 2));
        assert_eq!(chosen.market_capitalization, 1.0);
    }

    #[test]
    fn test_years_without_snapshot_month_are_absent() {
        let rows = vec![
            row("A", date(2019, 1, 2), 1.0),
            row("A", date(2020, 3, 2), 1.0),
            row("B", date(2020, 1, 2), 1.0),
        ];
        let keys: Vec<_> = AnnualSnapshot::default()
            .select(rows.iter())
            .into_keys()
            .collect();
        assert_eq!(
            keys,
            vec![
                SecurityYear::new("170", "A", 2019),
                SecurityYear::new("170", "B", 2020),
            ]
        );
    }

    #[test]
    fn test_other_month() {
        let rows = vec![row("A", date(2020, 1, 2), 1.0), row("A", date(2020, 7, 1), 2.0)];
        let snapshot = AnnualSnapshot::new(SnapshotMonth::new(7).unwrap());
        let picked = snapshot.select(rows.iter());
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.values().next().unwrap().market_capitalization, 2.0);
    }

    #[test]
    fn test_paired_values_keep_their_row() {
        let rows = [row("A", date(2020, 1, 3), 0.0), row("A", date(2020, 1, 2), 0.0)];
        let paired = rows.iter().zip([10.0, 20.0]);
        let picked = AnnualSnapshot::default().select(paired);
        let (obs, value) = picked[&SecurityYear::new("170", "A", 2020)];
        assert_eq!(obs.date, date(2020, 1, 2));
        assert_eq!(value, 20.0);
    }
}
