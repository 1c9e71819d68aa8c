//! Typed raw rows and the keys shared by every downstream table.
//!
//! Missing numeric values are carried as `NaN` so they propagate through
//! arithmetic exactly like the missing values of a dataframe would.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One listed security, identified jointly by exchange and security id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SecurityKey {
    /// Exchange code
    pub exchange: String,
    /// Security identifier (ISIN)
    pub security_id: String,
}

impl SecurityKey {
    /// Create a new security key.
    pub fn new(exchange: impl Into<String>, security_id: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            security_id: security_id.into(),
        }
    }

    /// The security-year of this security for `year`.
    pub fn at_year(&self, year: i32) -> SecurityYear {
        SecurityYear {
            exchange: self.exchange.clone(),
            security_id: self.security_id.clone(),
            year,
        }
    }
}

impl fmt::Display for SecurityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange, self.security_id)
    }
}

/// The unit of observation of the factor panel: one security in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SecurityYear {
    /// Exchange code
    pub exchange: String,
    /// Security identifier (ISIN)
    pub security_id: String,
    /// Calendar year
    pub year: i32,
}

impl SecurityYear {
    /// Create a new security-year key.
    pub fn new(exchange: impl Into<String>, security_id: impl Into<String>, year: i32) -> Self {
        Self {
            exchange: exchange.into(),
            security_id: security_id.into(),
            year,
        }
    }

    /// The security this key belongs to.
    pub fn security(&self) -> SecurityKey {
        SecurityKey::new(self.exchange.clone(), self.security_id.clone())
    }
}

impl fmt::Display for SecurityYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.exchange, self.security_id, self.year)
    }
}

/// A single trading-day observation for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    /// Exchange code
    pub exchange: String,
    /// Security identifier (ISIN)
    pub security_id: String,
    /// Trade date
    pub date: NaiveDate,
    /// Company name
    #[serde(default)]
    pub company_name: String,
    /// Open price
    #[serde(deserialize_with = "nan_if_missing")]
    pub open_price: f64,
    /// High price
    #[serde(deserialize_with = "nan_if_missing")]
    pub high_price: f64,
    /// Low price
    #[serde(deserialize_with = "nan_if_missing")]
    pub low_price: f64,
    /// Close price
    #[serde(deserialize_with = "nan_if_missing")]
    pub close_price: f64,
    /// Split/dividend adjusted open price
    #[serde(deserialize_with = "nan_if_missing")]
    pub adj_open_price: f64,
    /// Adjusted high price
    #[serde(deserialize_with = "nan_if_missing")]
    pub adj_high_price: f64,
    /// Adjusted low price
    #[serde(deserialize_with = "nan_if_missing")]
    pub adj_low_price: f64,
    /// Adjusted close price
    #[serde(deserialize_with = "nan_if_missing")]
    pub adj_close_price: f64,
    /// Shares traded
    #[serde(deserialize_with = "nan_if_missing")]
    pub trading_volume: f64,
    /// Adjusted shares traded
    #[serde(deserialize_with = "nan_if_missing")]
    pub adj_trading_volume: f64,
    /// Shares outstanding
    #[serde(deserialize_with = "nan_if_missing")]
    pub shares_outstanding: f64,
    /// Close price times shares outstanding
    #[serde(deserialize_with = "nan_if_missing")]
    pub market_capitalization: f64,
    /// Dividend per share paid on this date
    #[serde(deserialize_with = "nan_if_missing")]
    pub dividend_per_share: f64,
    /// Whether the price is a total-return price
    #[serde(default, deserialize_with = "flag")]
    pub total_return_flag: bool,
    /// Security type code
    #[serde(default)]
    pub security_type: String,
    /// GIC industry code
    #[serde(default)]
    pub gic_industry: Option<String>,
    /// GIC sub-industry code
    #[serde(default)]
    pub gic_sub_industry: Option<String>,
}

impl DailyObservation {
    /// Columns that must be present in any price input.
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "exchange",
        "security_id",
        "date",
        "open_price",
        "high_price",
        "low_price",
        "close_price",
        "adj_open_price",
        "adj_high_price",
        "adj_low_price",
        "adj_close_price",
        "trading_volume",
        "adj_trading_volume",
        "shares_outstanding",
        "market_capitalization",
        "dividend_per_share",
    ];

    /// An observation with every numeric field missing.
    pub fn empty(
        exchange: impl Into<String>,
        security_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            security_id: security_id.into(),
            date,
            company_name: String::new(),
            open_price: f64::NAN,
            high_price: f64::NAN,
            low_price: f64::NAN,
            close_price: f64::NAN,
            adj_open_price: f64::NAN,
            adj_high_price: f64::NAN,
            adj_low_price: f64::NAN,
            adj_close_price: f64::NAN,
            trading_volume: f64::NAN,
            adj_trading_volume: f64::NAN,
            shares_outstanding: f64::NAN,
            market_capitalization: f64::NAN,
            dividend_per_share: f64::NAN,
            total_return_flag: false,
            security_type: String::new(),
            gic_industry: None,
            gic_sub_industry: None,
        }
    }

    /// The security this observation belongs to.
    pub fn security(&self) -> SecurityKey {
        SecurityKey::new(self.exchange.clone(), self.security_id.clone())
    }

    /// Whether both observations belong to the same security.
    pub fn same_security(&self, other: &Self) -> bool {
        self.exchange == other.exchange && self.security_id == other.security_id
    }

    /// The security-year of this observation's date.
    pub fn security_year(&self) -> SecurityYear {
        SecurityYear::new(
            self.exchange.clone(),
            self.security_id.clone(),
            self.date.year(),
        )
    }
}

/// One annual financial statement for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundamental {
    /// Exchange code
    pub exchange: String,
    /// Security identifier (ISIN)
    pub security_id: String,
    /// Fiscal year of the statement
    pub fiscal_year: i32,
    /// Statement (fiscal-year-end) date
    pub statement_date: NaiveDate,
    /// Total assets
    #[serde(deserialize_with = "nan_if_missing")]
    pub assets: f64,
    /// Total revenue
    #[serde(deserialize_with = "nan_if_missing")]
    pub revenue: f64,
    /// Operating income after depreciation
    #[serde(deserialize_with = "nan_if_missing")]
    pub operating_income: f64,
    /// EBITDA
    #[serde(deserialize_with = "nan_if_missing")]
    pub ebitda: f64,
    /// Operating cash flow
    #[serde(deserialize_with = "nan_if_missing")]
    pub cash_flow: f64,
}

impl Fundamental {
    /// Columns that must be present in any fundamentals input.
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "exchange",
        "security_id",
        "fiscal_year",
        "statement_date",
        "assets",
        "revenue",
        "operating_income",
        "ebitda",
        "cash_flow",
    ];

    /// A statement with every numeric field missing.
    pub fn empty(
        exchange: impl Into<String>,
        security_id: impl Into<String>,
        fiscal_year: i32,
        statement_date: NaiveDate,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            security_id: security_id.into(),
            fiscal_year,
            statement_date,
            assets: f64::NAN,
            revenue: f64::NAN,
            operating_income: f64::NAN,
            ebitda: f64::NAN,
            cash_flow: f64::NAN,
        }
    }

    /// The security this statement belongs to.
    pub fn security(&self) -> SecurityKey {
        SecurityKey::new(self.exchange.clone(), self.security_id.clone())
    }
}

fn nan_if_missing<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid flag value: {other}"
        ))),
    }
}
