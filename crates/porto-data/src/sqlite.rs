//! SQLite provider over Compustat-style global security tables.
//!
//! The database holds raw daily security rows (`g_secd`) and raw annual
//! statements (`g_funda`). Adjusted prices, adjusted volume, market cap and
//! the total-return flag are derived in the price query; statement
//! selection (consolidated, historical, primary source, earliest statement
//! per fiscal year) happens in the fundamentals query.

use crate::error::Result;
use crate::provider::MarketDataProvider;
use crate::range::DateRange;
use crate::types::{DailyObservation, Fundamental};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params, params_from_iter};
use std::path::Path;

/// Raw daily row as stored in `g_secd`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPriceRow {
    /// Security identifier (ISIN), `None` for unidentified issues
    pub isin: Option<String>,
    /// Trade date
    pub date: NaiveDate,
    /// Company name
    pub company_name: String,
    /// Exchange code
    pub exchange: String,
    /// Open price
    pub open: Option<f64>,
    /// High price
    pub high: Option<f64>,
    /// Low price
    pub low: Option<f64>,
    /// Close price
    pub close: Option<f64>,
    /// Cumulative adjustment factor
    pub adjustment_factor: Option<f64>,
    /// Shares traded
    pub volume: Option<f64>,
    /// Shares outstanding
    pub shares_outstanding: Option<f64>,
    /// Dividend per share
    pub dividend: Option<f64>,
    /// Price status code (`"10"` marks a total-return price)
    pub price_status: Option<String>,
    /// Security type code
    pub security_type: Option<String>,
    /// GIC industry code
    pub gic_industry: Option<String>,
    /// GIC sub-industry code
    pub gic_sub_industry: Option<String>,
}

/// Raw annual statement as stored in `g_funda`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatementRow {
    /// Security identifier (ISIN)
    pub isin: Option<String>,
    /// Exchange code
    pub exchange: String,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Statement date
    pub date: NaiveDate,
    /// Total assets
    pub assets: Option<f64>,
    /// Revenue
    pub revenue: Option<f64>,
    /// Operating income after depreciation
    pub operating_income: Option<f64>,
    /// EBITDA
    pub ebitda: Option<f64>,
    /// Operating cash flow
    pub cash_flow: Option<f64>,
    /// Population source (`"I"` = international primary source)
    pub population_source: String,
    /// Data format (`"HIST_STD"` = historical standardized)
    pub data_format: String,
    /// Consolidation level (`"C"` = consolidated)
    pub consolidation: String,
}

/// SQLite-backed [`MarketDataProvider`].
#[derive(Debug)]
pub struct SqliteProvider {
    conn: Connection,
}

impl SqliteProvider {
    /// Open (and if needed initialize) a database file.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let provider = Self { conn };
        provider.initialize_schema()?;
        Ok(provider)
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let provider = Self { conn };
        provider.initialize_schema()?;
        Ok(provider)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS g_secd (
                isin TEXT,
                datadate TEXT NOT NULL,
                conm TEXT,
                exchg TEXT NOT NULL,
                prcod REAL,
                prchd REAL,
                prcld REAL,
                prccd REAL,
                ajexdi REAL,
                cshtrd REAL,
                cshoc REAL,
                div REAL,
                prcstd TEXT,
                tpci TEXT,
                gind TEXT,
                gsubind TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_g_secd_exchg_date ON g_secd(exchg, datadate)",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS g_funda (
                isin TEXT,
                exchg TEXT NOT NULL,
                fyear INTEGER NOT NULL,
                datadate TEXT NOT NULL,
                \"at\" REAL,
                revt REAL,
                oiadp REAL,
                ebitda REAL,
                oancf REAL,
                popsrc TEXT,
                datafmt TEXT,
                consol TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Store one raw daily row.
    pub fn put_price(&self, row: &RawPriceRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO g_secd (isin, datadate, conm, exchg, prcod, prchd, prcld, prccd,
                ajexdi, cshtrd, cshoc, div, prcstd, tpci, gind, gsubind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                row.isin,
                row.date,
                row.company_name,
                row.exchange,
                row.open,
                row.high,
                row.low,
                row.close,
                row.adjustment_factor,
                row.volume,
                row.shares_outstanding,
                row.dividend,
                row.price_status,
                row.security_type,
                row.gic_industry,
                row.gic_sub_industry,
            ],
        )?;
        Ok(())
    }

    /// Store raw daily rows in one transaction.
    pub fn put_prices(&mut self, rows: &[RawPriceRow]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO g_secd (isin, datadate, conm, exchg, prcod, prchd, prcld, prccd,
                    ajexdi, cshtrd, cshoc, div, prcstd, tpci, gind, gsubind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.isin,
                    row.date,
                    row.company_name,
                    row.exchange,
                    row.open,
                    row.high,
                    row.low,
                    row.close,
                    row.adjustment_factor,
                    row.volume,
                    row.shares_outstanding,
                    row.dividend,
                    row.price_status,
                    row.security_type,
                    row.gic_industry,
                    row.gic_sub_industry,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Store one raw statement.
    pub fn put_statement(&self, row: &RawStatementRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO g_funda (isin, exchg, fyear, datadate, \"at\", revt, oiadp, ebitda,
                oancf, popsrc, datafmt, consol)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.isin,
                row.exchange,
                row.fiscal_year,
                row.date,
                row.assets,
                row.revenue,
                row.operating_income,
                row.ebitda,
                row.cash_flow,
                row.population_source,
                row.data_format,
                row.consolidation,
            ],
        )?;
        Ok(())
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn real(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(f64::NAN))
}

impl MarketDataProvider for SqliteProvider {
    fn fetch_prices(
        &self,
        exchanges: &[String],
        range: &DateRange,
    ) -> Result<Vec<DailyObservation>> {
        if exchanges.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT isin, datadate, conm, exchg,
                    prcod, prchd, prcld, prccd,
                    prcod / ajexdi, prchd / ajexdi, prcld / ajexdi, prccd / ajexdi,
                    cshtrd, cshtrd * ajexdi, cshoc, prccd * cshoc, div,
                    CASE WHEN prcstd = '10' THEN 1 ELSE 0 END,
                    tpci, gind, gsubind
             FROM g_secd
             WHERE datadate > ? AND datadate < ?
               AND exchg IN ({})
               AND isin IS NOT NULL",
            placeholders(exchanges.len())
        );

        let mut bindings = vec![range.start().to_string(), range.end().to_string()];
        bindings.extend(exchanges.iter().cloned());

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bindings.iter()), |row| {
            Ok(DailyObservation {
                security_id: row.get(0)?,
                date: row.get(1)?,
                company_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                exchange: row.get(3)?,
                open_price: real(row, 4)?,
                high_price: real(row, 5)?,
                low_price: real(row, 6)?,
                close_price: real(row, 7)?,
                adj_open_price: real(row, 8)?,
                adj_high_price: real(row, 9)?,
                adj_low_price: real(row, 10)?,
                adj_close_price: real(row, 11)?,
                trading_volume: real(row, 12)?,
                adj_trading_volume: real(row, 13)?,
                shares_outstanding: real(row, 14)?,
                market_capitalization: real(row, 15)?,
                dividend_per_share: real(row, 16)?,
                total_return_flag: row.get::<_, i64>(17)? == 1,
                security_type: row.get::<_, Option<String>>(18)?.unwrap_or_default(),
                gic_industry: row.get(19)?,
                gic_sub_industry: row.get(20)?,
            })
        })?;

        let mut observations = Vec::new();
        for row in rows {
            observations.push(row?);
        }
        Ok(observations)
    }

    fn fetch_fundamentals(
        &self,
        exchanges: &[String],
        range: &DateRange,
    ) -> Result<Vec<Fundamental>> {
        if exchanges.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT isin, exchg, fyear, datadate, \"at\", revt, oiadp, ebitda, oancf
             FROM (
                SELECT *,
                       ROW_NUMBER() OVER (PARTITION BY isin, fyear ORDER BY datadate) AS rn
                FROM g_funda
                WHERE datadate > ? AND datadate <= ?
                  AND exchg IN ({})
                  AND popsrc = 'I'
                  AND datafmt = 'HIST_STD'
                  AND consol = 'C'
                  AND isin IS NOT NULL
             )
             WHERE rn = 1",
            placeholders(exchanges.len())
        );

        let mut bindings = vec![range.start().to_string(), range.end().to_string()];
        bindings.extend(exchanges.iter().cloned());

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bindings.iter()), |row| {
            Ok(Fundamental {
                security_id: row.get(0)?,
                exchange: row.get(1)?,
                fiscal_year: row.get(2)?,
                statement_date: row.get(3)?,
                assets: real(row, 4)?,
                revenue: real(row, 5)?,
                operating_income: real(row, 6)?,
                ebitda: real(row, 7)?,
                cash_flow: real(row, 8)?,
            })
        })?;

        let mut statements = Vec::new();
        for row in rows {
            statements.push(row?);
        }
        Ok(statements)
    }
}
