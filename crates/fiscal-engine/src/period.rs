//! Fiscal period boundaries.
//!
//! Each quarter is split into three periods of 5, 4 and 4 weeks. In a
//! 53-week year the third period of quarter 1 takes the leap week and runs
//! 5 weeks; every later period moves a week later.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::year::{last_instant_before, resolve_year, FiscalYear, LEAP_WEEK_DAYS};

/// Number of periods in a fiscal year.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Number of periods in a fiscal quarter.
pub const PERIODS_PER_QUARTER: u32 = 3;

const WEEK_DAYS: i64 = 7;
const FOUR_WEEKS_DAYS: i64 = 28;

/// A resolved fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FiscalPeriod {
    /// The fiscal year the period belongs to.
    pub year: i32,
    /// Period index, 1-12.
    pub period: u32,
    /// First instant of the period.
    pub start: DateTime<Utc>,
    /// Last instant of the period.
    pub end: DateTime<Utc>,
}

impl FiscalPeriod {
    /// Length of the period in whole days (28 or 35).
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `instant` falls within `[start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Index (1-4) of the quarter this period belongs to.
    pub fn quarter(&self) -> u32 {
        (self.period - 1) / PERIODS_PER_QUARTER + 1
    }
}

impl FiscalYear {
    /// Period `period` of this year. The index is clamped to `1..=12`.
    pub fn period(&self, period: i32) -> FiscalPeriod {
        let p = i64::from(period.clamp(1, PERIODS_PER_YEAR as i32) - 1);

        // Four weeks per period plus one extra week for the first period of
        // each quarter.
        let mut start_days = p * FOUR_WEEKS_DAYS + ((p + 2) / 3) * WEEK_DAYS;
        let mut end_days = (p + 1) * FOUR_WEEKS_DAYS + ((p + 3) / 3) * WEEK_DAYS;
        if self.is_leap() {
            start_days += ((p + 9) / 12) * LEAP_WEEK_DAYS;
            end_days += ((p + 10) / 12) * LEAP_WEEK_DAYS;
        }

        FiscalPeriod {
            year: self.number,
            period: (p + 1) as u32,
            start: self.start + chrono::Duration::days(start_days),
            end: last_instant_before(self.start + chrono::Duration::days(end_days)),
        }
    }

    /// All twelve periods of this year, in order.
    pub fn periods(&self) -> impl Iterator<Item = FiscalPeriod> {
        let year = *self;
        (1..=PERIODS_PER_YEAR as i32).map(move |p| year.period(p))
    }
}

/// Resolve the start and end of period `period` of fiscal year `year`.
///
/// Out-of-range period indices are clamped to `1..=12` rather than rejected.
///
/// # Errors
///
/// Propagates the errors of [`resolve_year`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fiscal_engine::resolve_period;
///
/// let p7 = resolve_period(2024, 7).unwrap();
/// assert_eq!(p7.start.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
/// assert_eq!(p7.length_days(), 35);
/// ```
pub fn resolve_period(year: i32, period: i32) -> Result<FiscalPeriod> {
    Ok(resolve_year(year)?.period(period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::year::{anchor, fiscal_years};
    use chrono::NaiveDate;

    #[test]
    fn test_first_period_of_anchor_year() {
        let p1 = resolve_period(2006, 1).unwrap();
        assert_eq!(p1.start, anchor());
        assert_eq!(
            p1.end,
            anchor() + chrono::Duration::days(35) - chrono::Duration::nanoseconds(1)
        );
    }

    #[test]
    fn test_regular_year_pattern() {
        let fy = resolve_year(2024).unwrap();
        let lengths: Vec<i64> = fy.periods().map(|p| p.length_days()).collect();
        assert_eq!(lengths, vec![35, 28, 28, 35, 28, 28, 35, 28, 28, 35, 28, 28]);
    }

    #[test]
    fn test_leap_year_pattern() {
        let fy = resolve_year(2006).unwrap();
        let lengths: Vec<i64> = fy.periods().map(|p| p.length_days()).collect();
        assert_eq!(lengths, vec![35, 28, 35, 35, 28, 28, 35, 28, 28, 35, 28, 28]);
    }

    #[test]
    fn test_leap_year_third_period() {
        let p3 = resolve_period(2023, 3).unwrap();
        assert_eq!(p3.length_days(), 35);
        assert_eq!(p3.start.date_naive(), NaiveDate::from_ymd_opt(2022, 11, 27).unwrap());
        assert_eq!(p3.end.date_naive(), NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
    }

    #[test]
    fn test_periods_tile_quarters() {
        for fy in fiscal_years().take(120) {
            let periods: Vec<FiscalPeriod> = fy.periods().collect();
            for quarter in fy.quarters() {
                let own: Vec<&FiscalPeriod> = periods
                    .iter()
                    .filter(|p| p.quarter() == quarter.quarter)
                    .collect();
                assert_eq!(own.len(), PERIODS_PER_QUARTER as usize);
                assert_eq!(own[0].start, quarter.start, "FY{} Q{}", fy.number, quarter.quarter);
                assert_eq!(own[2].end, quarter.end, "FY{} Q{}", fy.number, quarter.quarter);
                let total: i64 = own.iter().map(|p| p.length_days()).sum();
                assert_eq!(total, quarter.length_days());
            }
            for pair in periods.windows(2) {
                assert_eq!(pair[0].end + chrono::Duration::nanoseconds(1), pair[1].start);
            }
            assert_eq!(periods[0].start, fy.start);
            assert_eq!(periods[11].end, fy.end);
        }
    }

    #[test]
    fn test_period_quarter_mapping() {
        let fy = resolve_year(2024).unwrap();
        let quarters: Vec<u32> = fy.periods().map(|p| p.quarter()).collect();
        assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn test_period_index_is_clamped() {
        assert_eq!(resolve_period(2024, 0).unwrap(), resolve_period(2024, 1).unwrap());
        assert_eq!(resolve_period(2024, 13).unwrap(), resolve_period(2024, 12).unwrap());
        assert_eq!(resolve_period(2024, i32::MIN).unwrap().period, 1);
    }

    #[test]
    fn test_period_before_anchor_is_rejected() {
        assert!(resolve_period(2001, 6).is_err());
    }
}
