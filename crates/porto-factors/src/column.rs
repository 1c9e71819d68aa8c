//! The closed set of factor panel columns.

use crate::error::FactorError;
use crate::registry::FactorCategory;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A value column of the merged factor panel.
///
/// Declaration order is the panel's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactorColumn {
    /// Market capitalization at the snapshot date
    MarketCapitalization,
    /// Total assets
    Assets,
    /// Revenue
    Revenue,
    /// Operating income
    OperatingIncome,
    /// EBITDA
    Ebitda,
    /// Operating cash flow
    CashFlow,
    /// Price to book (market cap over assets)
    Pbr,
    /// Price to sales
    Psr,
    /// Price to operating income
    Por,
    /// Price to EBITDA
    Per,
    /// Price to cash flow
    Pcr,
    /// Dividend per share at the snapshot date
    DividendPerShare,
    /// Daily return volatility over 1 month
    DailyVol1m,
    /// Daily return volatility over 3 months
    DailyVol3m,
    /// Daily return volatility over 6 months
    DailyVol6m,
    /// Daily return volatility over 12 months
    DailyVol12m,
    /// Daily return volatility over 24 months
    DailyVol24m,
    /// Daily return volatility over 36 months
    DailyVol36m,
    /// Average daily transaction amount over 1 month
    AvgTransactionAmount1m,
    /// Average daily transaction amount over 3 months
    AvgTransactionAmount3m,
    /// Average daily transaction amount over 6 months
    AvgTransactionAmount6m,
    /// Average daily transaction amount over 12 months
    AvgTransactionAmount12m,
    /// Average daily transaction amount over 24 months
    AvgTransactionAmount24m,
    /// Average daily transaction amount over 36 months
    AvgTransactionAmount36m,
    /// Year-over-year asset growth
    AssetsYoy,
    /// Year-over-year revenue growth
    RevenueYoy,
    /// Year-over-year operating income growth
    OperatingIncomeYoy,
    /// Year-over-year EBITDA growth
    EbitdaYoy,
    /// Year-over-year cash flow growth
    CashFlowYoy,
    /// Price change over the previous month
    Momentum1m,
    /// Price change over the previous 6 months
    Momentum6m,
    /// Price change over the previous 12 months
    Momentum12m,
    /// Price change over the previous 24 months
    Momentum24m,
    /// Price change over the previous 36 months
    Momentum36m,
    /// Price change over the following 12 months
    Return1yLater,
}

impl FactorColumn {
    /// Number of panel columns.
    pub const COUNT: usize = 35;

    /// The forward return, the dependent variable of the regression.
    pub const DEPENDENT: Self = Self::Return1yLater;

    /// Every column in panel order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MarketCapitalization,
        Self::Assets,
        Self::Revenue,
        Self::OperatingIncome,
        Self::Ebitda,
        Self::CashFlow,
        Self::Pbr,
        Self::Psr,
        Self::Por,
        Self::Per,
        Self::Pcr,
        Self::DividendPerShare,
        Self::DailyVol1m,
        Self::DailyVol3m,
        Self::DailyVol6m,
        Self::DailyVol12m,
        Self::DailyVol24m,
        Self::DailyVol36m,
        Self::AvgTransactionAmount1m,
        Self::AvgTransactionAmount3m,
        Self::AvgTransactionAmount6m,
        Self::AvgTransactionAmount12m,
        Self::AvgTransactionAmount24m,
        Self::AvgTransactionAmount36m,
        Self::AssetsYoy,
        Self::RevenueYoy,
        Self::OperatingIncomeYoy,
        Self::EbitdaYoy,
        Self::CashFlowYoy,
        Self::Momentum1m,
        Self::Momentum6m,
        Self::Momentum12m,
        Self::Momentum24m,
        Self::Momentum36m,
        Self::Return1yLater,
    ];

    /// Position of the column in the panel.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column name as written to exports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MarketCapitalization => "market_capitalization",
            Self::Assets => "assets",
            Self::Revenue => "revenue",
            Self::OperatingIncome => "operating_income",
            Self::Ebitda => "ebitda",
            Self::CashFlow => "cash_flow",
            Self::Pbr => "pbr",
            Self::Psr => "psr",
            Self::Por => "por",
            Self::Per => "per",
            Self::Pcr => "pcr",
            Self::DividendPerShare => "dividend_per_share",
            Self::DailyVol1m => "daily_vol_1m",
            Self::DailyVol3m => "daily_vol_3m",
            Self::DailyVol6m => "daily_vol_6m",
            Self::DailyVol12m => "daily_vol_12m",
            Self::DailyVol24m => "daily_vol_24m",
            Self::DailyVol36m => "daily_vol_36m",
            Self::AvgTransactionAmount1m => "avg_transaction_amount_1m",
            Self::AvgTransactionAmount3m => "avg_transaction_amount_3m",
            Self::AvgTransactionAmount6m => "avg_transaction_amount_6m",
            Self::AvgTransactionAmount12m => "avg_transaction_amount_12m",
            Self::AvgTransactionAmount24m => "avg_transaction_amount_24m",
            Self::AvgTransactionAmount36m => "avg_transaction_amount_36m",
            Self::AssetsYoy => "assets_yoy",
            Self::RevenueYoy => "revenue_yoy",
            Self::OperatingIncomeYoy => "operating_income_yoy",
            Self::EbitdaYoy => "ebitda_yoy",
            Self::CashFlowYoy => "cash_flow_yoy",
            Self::Momentum1m => "momentum_1m",
            Self::Momentum6m => "momentum_6m",
            Self::Momentum12m => "momentum_12m",
            Self::Momentum24m => "momentum_24m",
            Self::Momentum36m => "momentum_36m",
            Self::Return1yLater => "return_1y_later",
        }
    }

    /// The factor table the column comes from.
    pub const fn category(self) -> FactorCategory {
        match self {
            Self::MarketCapitalization => FactorCategory::Size,
            Self::Assets
            | Self::Revenue
            | Self::OperatingIncome
            | Self::Ebitda
            | Self::CashFlow => FactorCategory::Quality,
            Self::Pbr | Self::Psr | Self::Por | Self::Per | Self::Pcr => FactorCategory::Value,
            Self::DividendPerShare => FactorCategory::Yield,
            Self::DailyVol1m
            | Self::DailyVol3m
            | Self::DailyVol6m
            | Self::DailyVol12m
            | Self::DailyVol24m
            | Self::DailyVol36m => FactorCategory::Volatility,
            Self::AvgTransactionAmount1m
            | Self::AvgTransactionAmount3m
            | Self::AvgTransactionAmount6m
            | Self::AvgTransactionAmount12m
            | Self::AvgTransactionAmount24m
            | Self::AvgTransactionAmount36m => FactorCategory::Liquidity,
            Self::AssetsYoy
            | Self::RevenueYoy
            | Self::OperatingIncomeYoy
            | Self::EbitdaYoy
            | Self::CashFlowYoy => FactorCategory::Growth,
            Self::Momentum1m
            | Self::Momentum6m
            | Self::Momentum12m
            | Self::Momentum24m
            | Self::Momentum36m
            | Self::Return1yLater => FactorCategory::Momentum,
        }
    }

    /// Whether this is the regression's dependent variable.
    pub const fn is_dependent(self) -> bool {
        matches!(self, Self::Return1yLater)
    }

    /// Look a column up by its export name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for FactorColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FactorColumn {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FactorError::UnknownColumn(s.to_string()))
    }
}

impl Serialize for FactorColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FactorColumn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown column {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_declaration_order() {
        for (i, column) in FactorColumn::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
        }
        assert_eq!(FactorColumn::ALL[0], FactorColumn::MarketCapitalization);
        assert_eq!(FactorColumn::ALL[FactorColumn::COUNT - 1], FactorColumn::DEPENDENT);
    }

    #[test]
    fn test_names_are_unique_and_parse_back() {
        let mut names: Vec<_> = FactorColumn::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FactorColumn::COUNT);

        for column in FactorColumn::ALL {
            assert_eq!(column.name().parse::<FactorColumn>().unwrap(), column);
        }
        assert!("book_to_price".parse::<FactorColumn>().is_err());
    }

    #[test]
    fn test_only_forward_return_is_dependent() {
        let dependent: Vec<_> = FactorColumn::ALL
            .into_iter()
            .filter(|c| c.is_dependent())
            .collect();
        assert_eq!(dependent, vec![FactorColumn::Return1yLater]);
        assert_eq!(FactorColumn::Return1yLater.category(), FactorCategory::Momentum);
    }
}
