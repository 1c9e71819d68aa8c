//! Requested date range of a country run.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date range of a run.
///
/// Price rows are admitted strictly inside the range. Statements are admitted
/// after `start` up to and including `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a new range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// First date of the range (exclusive bound).
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the range.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a trade date falls inside the range.
    pub fn admits_trade_date(&self, date: NaiveDate) -> bool {
        self.start < date && date < self.end
    }

    /// Whether a statement date falls inside the range.
    pub fn admits_statement_date(&self, date: NaiveDate) -> bool {
        self.start < date && date <= self.end
    }
}
