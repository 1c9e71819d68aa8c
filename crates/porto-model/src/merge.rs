//! Strict inner join of the eight factor tables.

use crate::panel::{FactorPanel, PanelRow};
use porto_data::SecurityYear;
use porto_factors::{
    FactorColumn, FactorRecord, FactorTable, GrowthRecord, LiquidityRecord, MomentumRecord,
    QualityRecord, SizeRecord, ValueRecord, VolatilityRecord, YieldRecord,
};

/// The eight factor tables of one run.
#[derive(Debug, Clone, Default)]
pub struct FactorTables {
    /// Market capitalization
    pub size: FactorTable<SizeRecord>,
    /// Lagged statement levels
    pub quality: FactorTable<QualityRecord>,
    /// Price ratios
    pub value: FactorTable<ValueRecord>,
    /// Dividend per share
    pub dividend: FactorTable<YieldRecord>,
    /// Return volatility
    pub volatility: FactorTable<VolatilityRecord>,
    /// Transaction amount
    pub liquidity: FactorTable<LiquidityRecord>,
    /// Statement growth
    pub growth: FactorTable<GrowthRecord>,
    /// Past and forward price changes
    pub momentum: FactorTable<MomentumRecord>,
}

impl FactorTables {
    /// Whether every table holds a record for `key`.
    pub fn all_contain(&self, key: &SecurityYear) -> bool {
        self.size.contains_key(key)
            && self.quality.contains_key(key)
            && self.value.contains_key(key)
            && self.dividend.contains_key(key)
            && self.volatility.contains_key(key)
            && self.liquidity.contains_key(key)
            && self.growth.contains_key(key)
            && self.momentum.contains_key(key)
    }
}

fn fill<R: FactorRecord>(row: &mut PanelRow, record: Option<&R>) {
    if let Some(record) = record {
        for (column, value) in R::COLUMNS.iter().zip(record.values()) {
            row[column.index()] = value;
        }
    }
}

/// Joins factor tables on (exchange, security, year), keeping only keys
/// present in every table. Observation dates are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorMerger;

impl FactorMerger {
    /// Merge the tables into a panel in key order.
    pub fn merge(&self, tables: &FactorTables) -> FactorPanel {
        let mut keys = Vec::new();
        let mut rows = Vec::new();
        for key in tables.size.keys().filter(|k| tables.all_contain(k)) {
            let mut row: PanelRow = [f64::NAN; FactorColumn::COUNT];
            fill(&mut row, tables.size.get(key));
            fill(&mut row, tables.quality.get(key));
            fill(&mut row, tables.value.get(key));
            fill(&mut row, tables.dividend.get(key));
            fill(&mut row, tables.volatility.get(key));
            fill(&mut row, tables.liquidity.get(key));
            fill(&mut row, tables.growth.get(key));
            fill(&mut row, tables.momentum.get(key));
            keys.push(key.clone());
            rows.push(row);
        }
        FactorPanel::from_sorted(keys, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(id: &str, year: i32) -> SecurityYear {
        SecurityYear::new("170", id, year)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()
    }

    fn tables_for(keys: &[SecurityYear]) -> FactorTables {
        let d = date();
        FactorTables {
            size: FactorTable::from_records(keys.iter().map(|k| SizeRecord {
                key: k.clone(),
                date: d,
                market_capitalization: 1000.0,
            }))
            .unwrap(),
            quality: FactorTable::from_records(keys.iter().map(|k| QualityRecord {
                key: k.clone(),
                statement_date: d,
                assets: 500.0,
                revenue: 400.0,
                operating_income: 50.0,
                ebitda: 80.0,
                cash_flow: 40.0,
            }))
            .unwrap(),
            value: FactorTable::from_records(keys.iter().map(|k| ValueRecord {
                key: k.clone(),
                date: d,
                pbr: 2.0,
                psr: 2.5,
                por: 20.0,
                per: 12.5,
                pcr: 25.0,
            }))
            .unwrap(),
            dividend: FactorTable::from_records(keys.iter().map(|k| YieldRecord {
                key: k.clone(),
                date: d,
                dividend_per_share: 1.0,
            }))
            .unwrap(),
            volatility: FactorTable::from_records(keys.iter().map(|k| VolatilityRecord {
                key: k.clone(),
                date: d,
                daily_vol_1m: 0.01,
                daily_vol_3m: 0.01,
                daily_vol_6m: 0.01,
                daily_vol_12m: 0.01,
                daily_vol_24m: 0.01,
                daily_vol_36m: 0.01,
            }))
            .unwrap(),
            liquidity: FactorTable::from_records(keys.iter().map(|k| LiquidityRecord {
                key: k.clone(),
                date: d,
                avg_transaction_amount_1m: 1e6,
                avg_transaction_amount_3m: 1e6,
                avg_transaction_amount_6m: 1e6,
                avg_transaction_amount_12m: 1e6,
                avg_transaction_amount_24m: 1e6,
                avg_transaction_amount_36m: 1e6,
            }))
            .unwrap(),
            growth: FactorTable::from_records(keys.iter().map(|k| GrowthRecord {
                key: k.clone(),
                statement_date: d,
                assets_yoy: 0.1,
                revenue_yoy: 0.1,
                operating_income_yoy: 0.1,
                ebitda_yoy: 0.1,
                cash_flow_yoy: 0.1,
            }))
            .unwrap(),
            momentum: FactorTable::from_records(keys.iter().map(|k| MomentumRecord {
                key: k.clone(),
                date: d,
                momentum_1m: 0.01,
                momentum_6m: 0.06,
                momentum_12m: 0.12,
                momentum_24m: 0.24,
                momentum_36m: 0.36,
                return_1y_later: 0.05,
            }))
            .unwrap(),
        }
    }

    #[test]
    fn test_full_row_layout() {
        let tables = tables_for(&[key("A", 2020)]);
        let panel = FactorMerger.merge(&tables);
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.value(0, FactorColumn::MarketCapitalization), Some(1000.0));
        assert_eq!(panel.value(0, FactorColumn::Pbr), Some(2.0));
        assert_eq!(panel.value(0, FactorColumn::Momentum36m), Some(0.36));
        assert_eq!(panel.value(0, FactorColumn::Return1yLater), Some(0.05));
        assert!(panel.rows()[0].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_key_set_is_intersection() {
        let mut tables = tables_for(&[key("A", 2020), key("B", 2020), key("C", 2021)]);
        let partial = tables_for(&[key("A", 2020), key("C", 2021), key("D", 2021)]);
        tables.momentum = partial.momentum;
        tables.growth = tables_for(&[key("C", 2021), key("A", 2020)]).growth;

        let panel = FactorMerger.merge(&tables);
        assert_eq!(panel.keys(), &[key("A", 2020), key("C", 2021)]);
    }

    #[test]
    fn test_any_empty_table_empties_panel() {
        let mut tables = tables_for(&[key("A", 2020)]);
        tables.dividend = FactorTable::default();
        assert!(FactorMerger.merge(&tables).is_empty());
    }
}
