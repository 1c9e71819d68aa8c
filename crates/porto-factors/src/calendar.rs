//! Calendar-month arithmetic and month-start resolution.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month, `None` when `month` is not between 1 and 12.
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month `date` falls into.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number (1 to 12).
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The month `months` calendar months away (negative goes back).
    pub const fn shift(self, months: i32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// First observed date of every month of one security's series.
#[derive(Debug, Clone, Default)]
pub struct MonthlyIndex {
    starts: BTreeMap<YearMonth, NaiveDate>,
}

impl MonthlyIndex {
    /// Build the index from observation dates in any order.
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        let mut starts: BTreeMap<YearMonth, NaiveDate> = BTreeMap::new();
        for date in dates {
            starts
                .entry(YearMonth::of(date))
                .and_modify(|start| *start = (*start).min(date))
                .or_insert(date);
        }
        Self { starts }
    }

    /// First observed date of `month`.
    pub fn month_start(&self, month: YearMonth) -> Option<NaiveDate> {
        self.starts.get(&month).copied()
    }

    /// Month starts of every offset from `month`, or `None` when any month
    /// has no observation.
    pub fn resolve<const N: usize>(
        &self,
        month: YearMonth,
        offsets: &[i32; N],
    ) -> Option<[NaiveDate; N]> {
        let mut resolved = [NaiveDate::MIN; N];
        for (slot, offset) in resolved.iter_mut().zip(offsets) {
            *slot = self.month_start(month.shift(*offset))?;
        }
        Some(resolved)
    }

    /// Months with their start dates, in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, NaiveDate)> + '_ {
        self.starts.iter().map(|(m, d)| (*m, *d))
    }

    /// Number of observed months.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Whether no month is observed.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(2020, 1, -1, 2019, 12)]
    #[case(2020, 1, -36, 2017, 1)]
    #[case(2020, 1, 12, 2021, 1)]
    #[case(2020, 3, -6, 2019, 9)]
    #[case(2020, 12, 1, 2021, 1)]
    fn test_shift(
        #[case] year: i32,
        #[case] month: u32,
        #[case] offset: i32,
        #[case] expected_year: i32,
        #[case] expected_month: u32,
    ) {
        let shifted = YearMonth::new(year, month).unwrap().shift(offset);
        assert_eq!(shifted, YearMonth::new(expected_year, expected_month).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(YearMonth::new(2020, 0).is_none());
        assert!(YearMonth::new(2020, 13).is_none());
    }

    #[test]
    fn test_month_start_is_first_observation() {
        let index = MonthlyIndex::new([date(2020, 1, 3), date(2020, 1, 2), date(2020, 2, 4)]);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.month_start(YearMonth::of(date(2020, 1, 31))),
            Some(date(2020, 1, 2))
        );
    }

    #[test]
    fn test_resolve_is_all_or_nothing() {
        let index = MonthlyIndex::new([date(2019, 12, 2), date(2020, 1, 2), date(2021, 1, 4)]);
        let january = YearMonth::new(2020, 1).unwrap();
        assert_eq!(
            index.resolve(january, &[-1, 12]),
            Some([date(2019, 12, 2), date(2021, 1, 4)])
        );
        assert_eq!(index.resolve(january, &[-1, -6]), None);
    }
}
