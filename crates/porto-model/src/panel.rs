//! The wide security-year panel.

use polars::prelude::*;
use porto_data::SecurityYear;
use porto_factors::FactorColumn;

/// One row of panel values, indexed by [`FactorColumn::index`].
pub type PanelRow = [f64; FactorColumn::COUNT];

/// Factor values keyed by security-year, in key order.
#[derive(Debug, Clone, Default)]
pub struct FactorPanel {
    keys: Vec<SecurityYear>,
    rows: Vec<PanelRow>,
}

impl FactorPanel {
    /// Build a panel from keys and rows of equal length, sorted by key.
    pub(crate) fn from_sorted(keys: Vec<SecurityYear>, rows: Vec<PanelRow>) -> Self {
        debug_assert_eq!(keys.len(), rows.len());
        Self { keys, rows }
    }

    /// Build a panel from unordered `(key, row)` pairs.
    pub fn from_rows<I: IntoIterator<Item = (SecurityYear, PanelRow)>>(rows: I) -> Self {
        let mut pairs: Vec<_> = rows.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let (keys, rows) = pairs.into_iter().unzip();
        Self { keys, rows }
    }

    /// Number of security-years.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the panel holds no rows.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Row keys in order.
    pub fn keys(&self) -> &[SecurityYear] {
        &self.keys
    }

    /// Row values in key order.
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [PanelRow] {
        &mut self.rows
    }

    /// Keys paired with their rows.
    pub fn iter(&self) -> impl Iterator<Item = (&SecurityYear, &PanelRow)> {
        self.keys.iter().zip(self.rows.iter())
    }

    /// Value of `column` in row `row`.
    pub fn value(&self, row: usize, column: FactorColumn) -> Option<f64> {
        self.rows.get(row).map(|r| r[column.index()])
    }

    /// All values of `column`.
    pub fn column(&self, column: FactorColumn) -> Vec<f64> {
        self.rows.iter().map(|r| r[column.index()]).collect()
    }

    /// Share of missing values in `column`, `NaN` for an empty panel.
    pub fn missing_fraction(&self, column: FactorColumn) -> f64 {
        let missing = self
            .rows
            .iter()
            .filter(|r| r[column.index()].is_nan())
            .count();
        missing as f64 / self.rows.len() as f64
    }

    /// The panel as a polars frame: `exchange`, `security_id`, `year`, then
    /// one float column per [`FactorColumn`] in panel order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let exchanges: Vec<&str> = self.keys.iter().map(|k| k.exchange.as_str()).collect();
        let ids: Vec<&str> = self.keys.iter().map(|k| k.security_id.as_str()).collect();
        let years: Vec<i32> = self.keys.iter().map(|k| k.year).collect();

        let mut columns: Vec<Column> = Vec::with_capacity(FactorColumn::COUNT + 3);
        columns.push(Series::new("exchange".into(), exchanges).into());
        columns.push(Series::new("security_id".into(), ids).into());
        columns.push(Series::new("year".into(), years).into());
        for column in FactorColumn::ALL {
            columns.push(Series::new(column.name().into(), self.column(column)).into());
        }
        DataFrame::new(columns)
    }
}
