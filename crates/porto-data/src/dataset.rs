//! In-memory raw inputs of one country run.

use crate::range::DateRange;
use crate::types::{DailyObservation, Fundamental};
use std::collections::BTreeSet;

/// Raw daily price rows and annual statements for one country and date range.
///
/// Construction establishes the invariants every factor calculator relies on:
/// prices are sorted by (exchange, security, date) with one row per trading
/// day, and statements hold exactly one row per (exchange, security, fiscal
/// year), the one with the earliest statement date.
#[derive(Debug, Clone)]
pub struct PanelDataset {
    country: String,
    range: DateRange,
    prices: Vec<DailyObservation>,
    fundamentals: Vec<Fundamental>,
}

impl PanelDataset {
    /// Build a dataset, sorting prices and deduplicating statements.
    pub fn new(
        country: impl Into<String>,
        range: DateRange,
        mut prices: Vec<DailyObservation>,
        mut fundamentals: Vec<Fundamental>,
    ) -> Self {
        prices.sort_by(|a, b| {
            (&a.exchange, &a.security_id, a.date).cmp(&(&b.exchange, &b.security_id, b.date))
        });
        prices.dedup_by(|later, earlier| later.same_security(earlier) && later.date == earlier.date);

        fundamentals.sort_by(|a, b| {
            (&a.exchange, &a.security_id, a.fiscal_year, a.statement_date).cmp(&(
                &b.exchange,
                &b.security_id,
                b.fiscal_year,
                b.statement_date,
            ))
        });
        fundamentals.dedup_by(|later, earlier| {
            later.exchange == earlier.exchange
                && later.security_id == earlier.security_id
                && later.fiscal_year == earlier.fiscal_year
        });

        Self {
            country: country.into(),
            range,
            prices,
            fundamentals,
        }
    }

    /// Country of the run.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Date range of the run.
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Sorted daily observations.
    pub fn prices(&self) -> &[DailyObservation] {
        &self.prices
    }

    /// Deduplicated annual statements.
    pub fn fundamentals(&self) -> &[Fundamental] {
        &self.fundamentals
    }

    /// Daily observations split into one date-sorted slice per security.
    pub fn price_series(&self) -> impl Iterator<Item = &[DailyObservation]> {
        self.prices.chunk_by(|a, b| a.same_security(b))
    }

    /// Number of distinct securities with at least one price row.
    pub fn security_count(&self) -> usize {
        self.price_series().count()
    }

    /// Distinct exchanges present in the price rows.
    pub fn exchanges(&self) -> BTreeSet<&str> {
        self.prices.iter().map(|p| p.exchange.as_str()).collect()
    }

    /// Whether the run has neither prices nor statements.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.fundamentals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation(exchange: &str, id: &str, date: NaiveDate, close: f64) -> DailyObservation {
        let mut obs = DailyObservation::empty(exchange, id, date);
        obs.adj_close_price = close;
        obs
    }

    fn fundamental(exchange: &str, id: &str, fiscal_year: i32, assets: f64) -> Fundamental {
        let statement_date = NaiveDate::from_ymd_opt(fiscal_year, 12, 31).unwrap();
        let mut row = Fundamental::empty(exchange, id, fiscal_year, statement_date);
        row.assets = assets;
        row
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range() -> DateRange {
        DateRange::new(date(2000, 1, 1), date(2030, 1, 1)).unwrap()
    }

    #[test]
    fn test_prices_sorted_per_security() {
        let prices = vec![
            observation("KRX", "B", date(2020, 1, 3), 10.0),
            observation("KRX", "A", date(2020, 1, 3), 10.0),
            observation("KRX", "A", date(2020, 1, 2), 10.0),
        ];
        let dataset = PanelDataset::new("Korea", range(), prices, vec![]);
        let series: Vec<_> = dataset.price_series().collect();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0][0].security_id, "A");
        assert_eq!(series[0][0].date, date(2020, 1, 2));
        assert_eq!(series[1][0].security_id, "B");
        assert_eq!(dataset.security_count(), 2);
    }

    #[test]
    fn test_duplicate_trading_days_collapse() {
        let prices = vec![
            observation("KRX", "A", date(2020, 1, 2), 10.0),
            observation("KRX", "A", date(2020, 1, 2), 11.0),
        ];
        let dataset = PanelDataset::new("Korea", range(), prices, vec![]);
        assert_eq!(dataset.prices().len(), 1);
        assert_eq!(dataset.prices()[0].adj_close_price, 10.0);
    }

    #[test]
    fn test_fundamentals_keep_earliest_statement() {
        let mut late = fundamental("KRX", "A", 2018, 100.0);
        late.statement_date = date(2019, 6, 30);
        let mut early = fundamental("KRX", "A", 2018, 50.0);
        early.statement_date = date(2018, 12, 31);
        let other_year = fundamental("KRX", "A", 2019, 70.0);

        let dataset = PanelDataset::new("Korea", range(), vec![], vec![late, other_year, early]);
        let rows = dataset.fundamentals();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fiscal_year, 2018);
        assert_eq!(rows[0].assets, 50.0);
        assert_eq!(rows[1].fiscal_year, 2019);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = PanelDataset::new("Korea", range(), vec![], vec![]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.security_count(), 0);
        assert!(dataset.exchanges().is_empty());
    }
}
