//! Fiscal quarter boundaries.
//!
//! Quarters are 13 weeks (91 days). In a 53-week year the leap week belongs
//! entirely to quarter 1, which is then 98 days; quarters 2-4 keep their
//! nominal length and are shifted a week later.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::year::{last_instant_before, resolve_year, FiscalYear, LEAP_WEEK_DAYS};

/// Number of quarters in a fiscal year.
pub const QUARTERS_PER_YEAR: u32 = 4;

const QUARTER_DAYS: i64 = 91;

/// A resolved fiscal quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FiscalQuarter {
    /// The fiscal year the quarter belongs to.
    pub year: i32,
    /// Quarter index, 1-4.
    pub quarter: u32,
    /// First instant of the quarter.
    pub start: DateTime<Utc>,
    /// Last instant of the quarter.
    pub end: DateTime<Utc>,
}

impl FiscalQuarter {
    /// Length of the quarter in whole days (91 or 98).
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `instant` falls within `[start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl FiscalYear {
    /// Quarter `quarter` of this year. The index is clamped to `1..=4`.
    pub fn quarter(&self, quarter: i32) -> FiscalQuarter {
        let q = i64::from(quarter.clamp(1, QUARTERS_PER_YEAR as i32) - 1);

        let mut start_days = q * QUARTER_DAYS;
        let mut end_days = (q + 1) * QUARTER_DAYS;
        if self.is_leap() {
            // Zero for the start of Q1, one week for everything after it.
            start_days += ((q + 3) / 4) * LEAP_WEEK_DAYS;
            end_days += ((q + 4) / 4) * LEAP_WEEK_DAYS;
        }

        FiscalQuarter {
            year: self.number,
            quarter: (q + 1) as u32,
            start: self.start + chrono::Duration::days(start_days),
            end: last_instant_before(self.start + chrono::Duration::days(end_days)),
        }
    }

    /// All four quarters of this year, in order.
    pub fn quarters(&self) -> impl Iterator<Item = FiscalQuarter> {
        let year = *self;
        (1..=QUARTERS_PER_YEAR as i32).map(move |q| year.quarter(q))
    }
}

/// Resolve the start and end of quarter `quarter` of fiscal year `year`.
///
/// Out-of-range quarter indices are clamped to `1..=4` rather than rejected.
///
/// # Errors
///
/// Propagates the errors of [`resolve_year`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fiscal_engine::resolve_quarter;
///
/// // FY2023 is a 53-week year, so its first quarter runs 14 weeks.
/// let q1 = resolve_quarter(2023, 1).unwrap();
/// assert_eq!(q1.length_days(), 98);
/// assert_eq!(q1.end.date_naive(), NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
/// ```
pub fn resolve_quarter(year: i32, quarter: i32) -> Result<FiscalQuarter> {
    Ok(resolve_year(year)?.quarter(quarter))
}
