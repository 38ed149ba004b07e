//! Calendar arithmetic for Monday-first month grids.
//!
//! These are the only functions that know about the civil calendar; the rest
//! of the layout engine works on day-of-month and column indices.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{Error, Result};
use crate::types::{CalContext, ColumnsMode, DAYS_PER_WEEK, MONTH_WIDTH};

/// Check if a year is a leap year (proleptic Gregorian).
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

/// Offset of the first day of the month in a Monday-first week: 0 = Monday .. 6 = Sunday.
pub fn first_weekday_offset(year: i32, month: u32) -> usize {
    first_day_of_month(year, month).num_days_from_monday() as usize
}

/// Weekday of the 1st; Monday for an out-of-range month.
pub fn first_day_of_month(year: i32, month: u32) -> Weekday {
    NaiveDate::from_ymd_opt(year, month, 1).map_or(Weekday::Mon, |d| d.weekday())
}

/// Number of week rows needed to show `days` days starting at column `offset`.
pub fn week_count(offset: usize, days: u32) -> usize {
    (offset + days as usize).div_ceil(DAYS_PER_WEEK)
}

/// Canonical `YYYY-MM-DD` date key.
pub fn format_date(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse a strict `YYYY-MM-DD` key.
pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Every date from `start` to `end`, both inclusive. Empty when `end` precedes `start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

impl CalContext {
    pub fn months_per_row(&self) -> u32 {
        match self.columns {
            ColumnsMode::Fixed(n) => n,
            ColumnsMode::Auto => {
                // clamp to 1-3 for readability
                let month_width = MONTH_WIDTH + self.gutter_width;
                if let Some(term_width) = get_terminal_width() {
                    (term_width / month_width as u32).clamp(1, 3)
                } else {
                    3
                }
            }
        }
    }
}

/// Get terminal width using terminal_size crate.
fn get_terminal_width() -> Option<u32> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as u32)
}
