//! Conversion of polars frames handed over by an external provider.
//!
//! Column names are only looked up here, at the boundary. Everything past
//! this module works on [`DailyObservation`] and [`Fundamental`] records.

use crate::error::{DataError, Result};
use crate::types::{DailyObservation, Fundamental};
use chrono::NaiveDate;
use polars::prelude::*;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a price frame into typed observations.
///
/// Every column of [`DailyObservation::REQUIRED_COLUMNS`] must be present;
/// descriptive columns (`company_name`, `total_return_flag`, `security_type`,
/// `gic_industry`, `gic_sub_industry`) are optional.
pub fn prices_from_frame(frame: &DataFrame) -> Result<Vec<DailyObservation>> {
    const TABLE: &str = "prices";
    ensure_columns(frame, TABLE, DailyObservation::REQUIRED_COLUMNS)?;

    let exchange = required_strings(frame, TABLE, "exchange")?;
    let security_id = required_strings(frame, TABLE, "security_id")?;
    let date = required_dates(frame, TABLE, "date")?;
    let open_price = floats(frame, "open_price")?;
    let high_price = floats(frame, "high_price")?;
    let low_price = floats(frame, "low_price")?;
    let close_price = floats(frame, "close_price")?;
    let adj_open_price = floats(frame, "adj_open_price")?;
    let adj_high_price = floats(frame, "adj_high_price")?;
    let adj_low_price = floats(frame, "adj_low_price")?;
    let adj_close_price = floats(frame, "adj_close_price")?;
    let trading_volume = floats(frame, "trading_volume")?;
    let adj_trading_volume = floats(frame, "adj_trading_volume")?;
    let shares_outstanding = floats(frame, "shares_outstanding")?;
    let market_capitalization = floats(frame, "market_capitalization")?;
    let dividend_per_share = floats(frame, "dividend_per_share")?;

    let height = frame.height();
    let company_name = optional_strings(frame, "company_name", height)?;
    let total_return_flag = optional_flags(frame, "total_return_flag", height)?;
    let security_type = optional_strings(frame, "security_type", height)?;
    let gic_industry = optional_strings(frame, "gic_industry", height)?;
    let gic_sub_industry = optional_strings(frame, "gic_sub_industry", height)?;

    let mut rows = Vec::with_capacity(height);
    for i in 0..height {
        rows.push(DailyObservation {
            exchange: exchange[i].clone(),
            security_id: security_id[i].clone(),
            date: date[i],
            company_name: company_name[i].clone().unwrap_or_default(),
            open_price: open_price[i],
            high_price: high_price[i],
            low_price: low_price[i],
            close_price: close_price[i],
            adj_open_price: adj_open_price[i],
            adj_high_price: adj_high_price[i],
            adj_low_price: adj_low_price[i],
            adj_close_price: adj_close_price[i],
            trading_volume: trading_volume[i],
            adj_trading_volume: adj_trading_volume[i],
            shares_outstanding: shares_outstanding[i],
            market_capitalization: market_capitalization[i],
            dividend_per_share: dividend_per_share[i],
            total_return_flag: total_return_flag[i],
            security_type: security_type[i].clone().unwrap_or_default(),
            gic_industry: gic_industry[i].clone(),
            gic_sub_industry: gic_sub_industry[i].clone(),
        });
    }
    Ok(rows)
}

/// Convert a statement frame into typed fundamentals.
pub fn fundamentals_from_frame(frame: &DataFrame) -> Result<Vec<Fundamental>> {
    const TABLE: &str = "fundamentals";
    ensure_columns(frame, TABLE, Fundamental::REQUIRED_COLUMNS)?;

    let exchange = required_strings(frame, TABLE, "exchange")?;
    let security_id = required_strings(frame, TABLE, "security_id")?;
    let fiscal_year = required_years(frame, TABLE, "fiscal_year")?;
    let statement_date = required_dates(frame, TABLE, "statement_date")?;
    let assets = floats(frame, "assets")?;
    let revenue = floats(frame, "revenue")?;
    let operating_income = floats(frame, "operating_income")?;
    let ebitda = floats(frame, "ebitda")?;
    let cash_flow = floats(frame, "cash_flow")?;

    let rows = (0..frame.height())
        .map(|i| Fundamental {
            exchange: exchange[i].clone(),
            security_id: security_id[i].clone(),
            fiscal_year: fiscal_year[i],
            statement_date: statement_date[i],
            assets: assets[i],
            revenue: revenue[i],
            operating_income: operating_income[i],
            ebitda: ebitda[i],
            cash_flow: cash_flow[i],
        })
        .collect();
    Ok(rows)
}

fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame
        .get_column_names()
        .iter()
        .any(|c| c.as_str() == name)
}

fn ensure_columns(frame: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    match required.iter().find(|c| !has_column(frame, c)) {
        Some(column) => Err(DataError::missing_column(table, column)),
        None => Ok(()),
    }
}

fn series<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Series> {
    Ok(frame.column(name)?.as_materialized_series())
}

fn floats(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = series(frame, name)?.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn strings(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = series(frame, name)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn required_strings(frame: &DataFrame, table: &str, name: &str) -> Result<Vec<String>> {
    strings(frame, name)?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| null_in(table, name, i)))
        .collect()
}

fn optional_strings(frame: &DataFrame, name: &str, height: usize) -> Result<Vec<Option<String>>> {
    if has_column(frame, name) {
        strings(frame, name)
    } else {
        Ok(vec![None; height])
    }
}

fn optional_flags(frame: &DataFrame, name: &str, height: usize) -> Result<Vec<bool>> {
    if !has_column(frame, name) {
        return Ok(vec![false; height]);
    }
    let values = series(frame, name)?.cast(&DataType::Boolean)?;
    Ok(values
        .bool()?
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect())
}

fn required_years(frame: &DataFrame, table: &str, name: &str) -> Result<Vec<i32>> {
    let values = series(frame, name)?.cast(&DataType::Int32)?;
    values
        .i32()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| null_in(table, name, i)))
        .collect()
}

fn required_dates(frame: &DataFrame, table: &str, name: &str) -> Result<Vec<NaiveDate>> {
    let column = series(frame, name)?;
    match column.dtype() {
        DataType::Date => {
            let days = column.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    v.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                        .ok_or_else(|| null_in(table, name, i))
                })
                .collect()
        }
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let text = v.ok_or_else(|| null_in(table, name, i))?;
                NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
                    DataError::Parse(format!("{table}.{name} row {i}: '{text}': {e}"))
                })
            })
            .collect(),
        other => Err(DataError::Parse(format!(
            "{table}.{name} has unsupported type {other}, expected a date"
        ))),
    }
}

fn null_in(table: &str, name: &str, row: usize) -> DataError {
    DataError::Parse(format!("{table}.{name} is null at row {row}"))
}
