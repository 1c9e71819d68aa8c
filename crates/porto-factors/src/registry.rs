//! Factor Registry
//!
//! Static metadata for the eight factor calculators, used to list factors and
//! to map panel columns back to the calculator producing them.

use crate::column::FactorColumn;
use std::fmt;

/// Available factor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactorCategory {
    /// Size (market capitalization)
    Size,
    /// Quality (lagged statement levels)
    Quality,
    /// Value (price ratios)
    Value,
    /// Yield (dividend per share)
    Yield,
    /// Volatility (rolling return volatility)
    Volatility,
    /// Liquidity (rolling transaction amount)
    Liquidity,
    /// Growth (year-over-year statement growth)
    Growth,
    /// Momentum (past and forward price changes)
    Momentum,
}

impl FactorCategory {
    /// Every category in panel order.
    pub const ALL: [Self; 8] = [
        Self::Size,
        Self::Quality,
        Self::Value,
        Self::Yield,
        Self::Volatility,
        Self::Liquidity,
        Self::Growth,
        Self::Momentum,
    ];

    /// Lowercase category name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Quality => "quality",
            Self::Value => "value",
            Self::Yield => "yield",
            Self::Volatility => "volatility",
            Self::Liquidity => "liquidity",
            Self::Growth => "growth",
            Self::Momentum => "momentum",
        }
    }

    /// Panel columns of the category, in panel order.
    pub fn columns(self) -> Vec<FactorColumn> {
        FactorColumn::ALL
            .into_iter()
            .filter(|c| c.category() == self)
            .collect()
    }
}

impl fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Factor metadata
#[derive(Debug, Clone)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: &'static str,
    /// Factor category
    pub category: FactorCategory,
    /// Brief description of what the factor measures
    pub description: &'static str,
    /// Inputs the calculator reads
    pub inputs: &'static [&'static str],
}

impl FactorInfo {
    /// Panel columns the factor contributes.
    pub fn columns(&self) -> Vec<FactorColumn> {
        self.category.columns()
    }
}

/// Get all available factor info, in panel order
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            name: "size",
            category: FactorCategory::Size,
            description: "Market capitalization at the first January trading day",
            inputs: &["prices"],
        },
        FactorInfo {
            name: "quality",
            category: FactorCategory::Quality,
            description: "Statement levels shifted forward by the disclosure lag",
            inputs: &["fundamentals"],
        },
        FactorInfo {
            name: "value",
            category: FactorCategory::Value,
            description: "Market capitalization over statement levels",
            inputs: &["quality", "size"],
        },
        FactorInfo {
            name: "yield",
            category: FactorCategory::Yield,
            description: "Dividend per share at the first January trading day",
            inputs: &["prices"],
        },
        FactorInfo {
            name: "volatility",
            category: FactorCategory::Volatility,
            description: "Rolling standard deviation of daily returns over six horizons",
            inputs: &["prices"],
        },
        FactorInfo {
            name: "liquidity",
            category: FactorCategory::Liquidity,
            description: "Rolling mean of daily transaction amount over six horizons",
            inputs: &["prices"],
        },
        FactorInfo {
            name: "growth",
            category: FactorCategory::Growth,
            description: "Year-over-year change of the quality statement levels",
            inputs: &["quality"],
        },
        FactorInfo {
            name: "momentum",
            category: FactorCategory::Momentum,
            description: "Past price changes and the return over the following year",
            inputs: &["prices"],
        },
    ]
}

/// Get factor info by name
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    available_factors().into_iter().find(|f| f.name == name)
}

/// List all factor names
pub fn list_factor_names() -> Vec<&'static str> {
    available_factors().into_iter().map(|f| f.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_factors_count() {
        let factors = available_factors();
        assert_eq!(factors.len(), 8);
        let categories: Vec<_> = factors.iter().map(|f| f.category).collect();
        assert_eq!(categories, FactorCategory::ALL.to_vec());
    }

    #[test]
    fn test_columns_partition_the_panel() {
        let total: usize = available_factors().iter().map(|f| f.columns().len()).sum();
        assert_eq!(total, FactorColumn::COUNT);
    }

    #[test]
    fn test_get_factor_info() {
        let momentum = get_factor_info("momentum").unwrap();
        assert_eq!(momentum.category, FactorCategory::Momentum);
        assert!(momentum.columns().contains(&FactorColumn::Return1yLater));
        assert!(get_factor_info("beta").is_none());
    }

    #[test]
    fn test_list_factor_names() {
        let names = list_factor_names();
        assert_eq!(names.len(), 8);
        for category in FactorCategory::ALL {
            assert!(names.contains(&category.name()));
        }
    }
}
