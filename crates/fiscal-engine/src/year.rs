//! Fiscal year boundaries.
//!
//! Every fiscal year is derived by walking forward from a single fixed
//! anchor instant, one year at a time. A year is 52 weeks long unless its
//! 52-week end would fall before the 25th of the month, in which case it is
//! extended by a leap week to 53 weeks.
//!
//! There is no closed form: resolving year `N` costs one step per year
//! between the anchor and `N`. Callers that need many consecutive years
//! should use [`fiscal_years`], which pays for the walk once.

use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use tracing::trace;

use crate::error::{FiscalError, Result};

// ── Calendar constants ──────────────────────────────────────────────────────

/// Start of the first fiscal year, 2005-09-25T00:00:00Z, in Unix nanoseconds.
pub const ANCHOR_UNIX_NANOS: i64 = 1_127_606_400_000_000_000;

/// Number of the fiscal year that starts at the anchor.
pub const FIRST_FISCAL_YEAR: i32 = 2006;

/// Length of a 52-week year.
pub(crate) const NOMINAL_YEAR_DAYS: i64 = 364;

/// Length of the week added to a 53-week year.
pub(crate) const LEAP_WEEK_DAYS: i64 = 7;

/// A year end must land on or after this day of the month.
const YEAR_END_MIN_DAY: u32 = 25;

/// The instant the fiscal calendar is anchored to.
///
/// ```
/// use fiscal_engine::anchor;
///
/// assert_eq!(anchor().to_rfc3339(), "2005-09-25T00:00:00+00:00");
/// ```
pub fn anchor() -> DateTime<Utc> {
    Utc.timestamp_nanos(ANCHOR_UNIX_NANOS)
}

/// The instant one nanosecond before `t`.
pub(crate) fn last_instant_before(t: DateTime<Utc>) -> DateTime<Utc> {
    t - chrono::Duration::nanoseconds(1)
}

// ── FiscalYear ──────────────────────────────────────────────────────────────

/// A resolved fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FiscalYear {
    /// The fiscal year number (the calendar year in which it ends).
    pub number: i32,
    /// First instant of the year.
    pub start: DateTime<Utc>,
    /// Last instant of the year, one nanosecond before the next year starts.
    pub end: DateTime<Utc>,
}

impl FiscalYear {
    /// Build the fiscal year beginning at `start`, or `None` if its end is
    /// not representable.
    fn starting_at(start: DateTime<Utc>) -> Option<FiscalYear> {
        let next_start = next_year_start(start)?;
        Some(FiscalYear {
            number: next_start.year(),
            start,
            end: last_instant_before(next_start),
        })
    }

    /// Length of the year in whole days (364 or 371).
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether this is a 53-week year.
    pub fn is_leap(&self) -> bool {
        self.length_days() > NOMINAL_YEAR_DAYS
    }

    /// Whether `instant` falls within `[start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The fiscal year immediately following this one.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalError::YearOutOfRange`] if the following year's end is
    /// outside chrono's representable range.
    pub fn next(&self) -> Result<FiscalYear> {
        let start = self.end + chrono::Duration::nanoseconds(1);
        FiscalYear::starting_at(start).ok_or(FiscalError::YearOutOfRange {
            year: self.number + 1,
        })
    }
}

/// Apply the 52/53-week rule: the year beginning at `start` ends 364 days
/// later, or 371 days later if 364 days lands before the 25th.
fn next_year_start(start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let naive_end = start.checked_add_signed(chrono::Duration::days(NOMINAL_YEAR_DAYS))?;
    if naive_end.day() < YEAR_END_MIN_DAY {
        naive_end.checked_add_signed(chrono::Duration::days(LEAP_WEEK_DAYS))
    } else {
        Some(naive_end)
    }
}

// ── fiscal_years ────────────────────────────────────────────────────────────

/// Iterator over consecutive fiscal years, see [`fiscal_years`].
#[derive(Debug, Clone)]
pub struct FiscalYears {
    next_start: Option<DateTime<Utc>>,
}

impl Iterator for FiscalYears {
    type Item = FiscalYear;

    fn next(&mut self) -> Option<FiscalYear> {
        let start = self.next_start.take()?;
        let year = FiscalYear::starting_at(start)?;
        self.next_start = Some(year.end + chrono::Duration::nanoseconds(1));
        Some(year)
    }
}

impl FusedIterator for FiscalYears {}

/// Every fiscal year from the anchor year onward, in order.
///
/// The iterator ends only when a year's end would leave chrono's
/// representable range.
///
/// ```
/// use fiscal_engine::fiscal_years;
///
/// let numbers: Vec<i32> = fiscal_years().take(3).map(|y| y.number).collect();
/// assert_eq!(numbers, vec![2006, 2007, 2008]);
/// ```
pub fn fiscal_years() -> FiscalYears {
    FiscalYears {
        next_start: Some(anchor()),
    }
}

// ── resolve_year ────────────────────────────────────────────────────────────

/// Resolve the start and end of fiscal year `year`.
///
/// # Errors
///
/// Returns [`FiscalError::YearBeforeAnchor`] for years before
/// [`FIRST_FISCAL_YEAR`], or [`FiscalError::YearOutOfRange`] if the year
/// cannot be represented.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fiscal_engine::resolve_year;
///
/// let fy = resolve_year(2024).unwrap();
/// assert_eq!(fy.start.date_naive(), NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
/// assert_eq!(fy.end.date_naive(), NaiveDate::from_ymd_opt(2024, 9, 28).unwrap());
/// assert!(!fy.is_leap());
/// ```
pub fn resolve_year(year: i32) -> Result<FiscalYear> {
    if year < FIRST_FISCAL_YEAR {
        return Err(FiscalError::YearBeforeAnchor {
            year,
            first: FIRST_FISCAL_YEAR,
        });
    }

    for (steps, fy) in fiscal_years().enumerate() {
        if fy.number >= year {
            trace!(year, steps, "resolved fiscal year");
            return Ok(fy);
        }
    }
    Err(FiscalError::YearOutOfRange { year })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_anchor_is_exact() {
        let expected = Utc.with_ymd_and_hms(2005, 9, 25, 0, 0, 0).unwrap();
        assert_eq!(anchor(), expected);
    }

    #[test]
    fn test_first_year_is_53_weeks() {
        let fy = resolve_year(FIRST_FISCAL_YEAR).unwrap();
        assert_eq!(fy.number, 2006);
        assert_eq!(fy.start, anchor());
        assert_eq!(
            fy.end,
            anchor() + chrono::Duration::days(371) - chrono::Duration::nanoseconds(1)
        );
        assert!(fy.is_leap());
        assert_eq!(fy.length_days(), 371);
    }

    #[test]
    fn test_end_is_last_nanosecond() {
        let fy = resolve_year(2007).unwrap();
        assert_eq!(fy.end.date_naive(), date(2007, 9, 29));
        assert_eq!(fy.end.timestamp_subsec_nanos(), 999_999_999);
        assert_eq!(fy.end.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn test_known_boundaries() {
        let cases = [
            (2012, date(2011, 9, 25), date(2012, 9, 29), 371),
            (2015, date(2014, 9, 28), date(2015, 9, 26), 364),
            (2018, date(2017, 10, 1), date(2018, 9, 29), 364),
            (2023, date(2022, 9, 25), date(2023, 9, 30), 371),
            (2024, date(2023, 10, 1), date(2024, 9, 28), 364),
            (2028, date(2027, 9, 26), date(2028, 9, 30), 371),
        ];
        for (year, start, end, days) in cases {
            let fy = resolve_year(year).unwrap();
            assert_eq!(fy.start.date_naive(), start, "start of FY{year}");
            assert_eq!(fy.end.date_naive(), end, "end of FY{year}");
            assert_eq!(fy.length_days(), days, "length of FY{year}");
        }
    }

    #[test]
    fn test_leap_rule_matches_naive_projection() {
        for fy in fiscal_years().take(200) {
            let naive_end = fy.start + chrono::Duration::days(NOMINAL_YEAR_DAYS);
            assert_eq!(fy.is_leap(), naive_end.day() < YEAR_END_MIN_DAY, "FY{}", fy.number);
        }
    }

    #[test]
    fn test_years_are_contiguous() {
        let years: Vec<FiscalYear> = fiscal_years().take(300).collect();
        for pair in years.windows(2) {
            assert_eq!(pair[0].number + 1, pair[1].number);
            assert_eq!(pair[0].end + chrono::Duration::nanoseconds(1), pair[1].start);
        }
    }

    #[test]
    fn test_next_matches_resolve() {
        let fy = resolve_year(2030).unwrap();
        assert_eq!(fy.next().unwrap(), resolve_year(2031).unwrap());
    }

    #[test]
    fn test_iterator_matches_resolve() {
        let from_iter = fiscal_years().nth(50).unwrap();
        assert_eq!(from_iter, resolve_year(2056).unwrap());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let fy = resolve_year(2020).unwrap();
        assert!(fy.contains(fy.start));
        assert!(fy.contains(fy.end));
        assert!(!fy.contains(last_instant_before(fy.start)));
        assert!(!fy.contains(fy.end + chrono::Duration::nanoseconds(1)));
    }

    #[test]
    fn test_year_before_anchor_is_rejected() {
        let err = resolve_year(2005).unwrap_err();
        assert_eq!(
            err,
            FiscalError::YearBeforeAnchor {
                year: 2005,
                first: 2006
            }
        );
        assert!(resolve_year(i32::MIN).is_err());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        assert_eq!(resolve_year(2100).unwrap(), resolve_year(2100).unwrap());
    }
}
