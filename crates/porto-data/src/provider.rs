//! Interface to the external market-data source.

use crate::dataset::PanelDataset;
use crate::error::Result;
use crate::exchange::ExchangeMap;
use crate::range::DateRange;
use crate::types::{DailyObservation, Fundamental};

/// A blocking source of raw price and statement rows.
///
/// Implementations apply the exchange filter and the [`DateRange`] admission
/// rules themselves. Fundamentals must already be reduced to one
/// consolidated, historical, primary-source statement per security and
/// fiscal year where the source holds several.
pub trait MarketDataProvider {
    /// Daily price rows of the given exchanges inside `range`.
    fn fetch_prices(&self, exchanges: &[String], range: &DateRange)
    -> Result<Vec<DailyObservation>>;

    /// Annual statements of the given exchanges inside `range`.
    fn fetch_fundamentals(&self, exchanges: &[String], range: &DateRange)
    -> Result<Vec<Fundamental>>;
}

/// Provider over rows already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    prices: Vec<DailyObservation>,
    fundamentals: Vec<Fundamental>,
}

impl InMemoryProvider {
    /// Create a provider over the given rows.
    pub const fn new(prices: Vec<DailyObservation>, fundamentals: Vec<Fundamental>) -> Self {
        Self {
            prices,
            fundamentals,
        }
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn fetch_prices(
        &self,
        exchanges: &[String],
        range: &DateRange,
    ) -> Result<Vec<DailyObservation>> {
        Ok(filter_prices(self.prices.iter().cloned(), exchanges, range))
    }

    fn fetch_fundamentals(
        &self,
        exchanges: &[String],
        range: &DateRange,
    ) -> Result<Vec<Fundamental>> {
        Ok(filter_fundamentals(
            self.fundamentals.iter().cloned(),
            exchanges,
            range,
        ))
    }
}

/// Fetch prices and statements of every exchange of `country` and build the dataset.
pub fn load_dataset<P: MarketDataProvider + ?Sized>(
    provider: &P,
    map: &ExchangeMap,
    country: &str,
    range: DateRange,
) -> Result<PanelDataset> {
    let exchanges = map.exchanges_for(country)?;
    let prices = provider.fetch_prices(&exchanges, &range)?;
    let fundamentals = provider.fetch_fundamentals(&exchanges, &range)?;
    Ok(PanelDataset::new(country, range, prices, fundamentals))
}

pub(crate) fn filter_prices(
    rows: impl Iterator<Item = DailyObservation>,
    exchanges: &[String],
    range: &DateRange,
) -> Vec<DailyObservation> {
    rows.filter(|r| {
        !r.security_id.is_empty()
            && exchanges.contains(&r.exchange)
            && range.admits_trade_date(r.date)
    })
    .collect()
}

pub(crate) fn filter_fundamentals(
    rows: impl Iterator<Item = Fundamental>,
    exchanges: &[String],
    range: &DateRange,
) -> Vec<Fundamental> {
    rows.filter(|r| {
        !r.security_id.is_empty()
            && exchanges.contains(&r.exchange)
            && range.admits_statement_date(r.statement_date)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeEntry;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_in_memory_filters_exchange_and_dates() {
        let prices = vec![
            DailyObservation::empty("170", "A", date(2020, 1, 1)),
            DailyObservation::empty("170", "A", date(2020, 1, 2)),
            DailyObservation::empty("999", "B", date(2020, 1, 2)),
            DailyObservation::empty("170", "", date(2020, 1, 2)),
        ];
        let fundamentals = vec![
            Fundamental::empty("170", "A", 2019, date(2020, 12, 31)),
            Fundamental::empty("170", "A", 2020, date(2021, 12, 31)),
        ];
        let provider = InMemoryProvider::new(prices, fundamentals);
        let range = DateRange::new(date(2020, 1, 1), date(2020, 12, 31)).unwrap();
        let exchanges = vec!["170".to_string()];

        let prices = provider.fetch_prices(&exchanges, &range).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].date, date(2020, 1, 2));

        let statements = provider.fetch_fundamentals(&exchanges, &range).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].fiscal_year, 2019);
    }

    #[test]
    fn test_load_dataset_resolves_country() {
        let prices = vec![
            DailyObservation::empty("170", "A", date(2020, 1, 3)),
            DailyObservation::empty("999", "B", date(2020, 1, 3)),
        ];
        let provider = InMemoryProvider::new(prices, Vec::new());
        let map = ExchangeMap::from_entries(vec![
            ExchangeEntry {
                exchange: "170".to_string(),
                country: "Korea".to_string(),
            },
            ExchangeEntry {
                exchange: "999".to_string(),
                country: "Japan".to_string(),
            },
        ]);
        let range = DateRange::new(date(2020, 1, 1), date(2020, 12, 31)).unwrap();

        let dataset = load_dataset(&provider, &map, "Korea", range).unwrap();
        assert_eq!(dataset.country(), "Korea");
        assert_eq!(dataset.security_count(), 1);
        assert!(load_dataset(&provider, &map, "Chile", range).is_err());
    }
}
