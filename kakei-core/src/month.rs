//! Calendar-month canonicalization for budget keys and ledger windows.

use chrono::{Datelike, NaiveDate};

/// Last calendar day of `(year, month)`, or `None` for an out-of-range month.
///
/// This is the canonical budget month key: every entry for the same logical
/// month collides on it regardless of time-of-day or timezone drift.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Number of days in `(year, month)`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_end(year, month).map(|d| d.day()).unwrap_or(0)
}

/// Inclusive date bounds for a full year, `[Jan 1, Dec 31]`.
/// The budget grid query constrains `month_key` to this range.
pub fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}

/// Half-open date window `[start, end)` covering one calendar month.
///
/// Half-open avoids end-of-month boundary bugs when bucketing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Window for `(year, month)`, or `None` for an out-of-range month.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = month_end(year, month)?.succ_opt()?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}
