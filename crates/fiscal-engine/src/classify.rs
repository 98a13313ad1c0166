//! Classify an instant into the fiscal year, quarter and period containing it.
//!
//! The containing year is found from the instant's calendar year: a fiscal
//! year `N` always ends late in September or early in October of calendar
//! year `N`, so an instant belongs either to fiscal year `N` or `N + 1`.
//!
//! Quarters and periods are found by estimating an index from the number of
//! days since the year start and probing from there. The estimate divides by
//! the longest possible quarter (98 days) or period (35 days), so it never
//! lands more than one index past the answer; it can land one past when the
//! day count is rounded up in the last half hour of a range. The probe steps
//! back in that case and then scans forward, bounded by the last index.

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::error::{FiscalError, Result};
use crate::period::PERIODS_PER_YEAR;
use crate::quarter::QUARTERS_PER_YEAR;
use crate::year::{anchor, resolve_year, FiscalYear, FIRST_FISCAL_YEAR};

const LONGEST_QUARTER_DAYS: i64 = 98;
const LONGEST_PERIOD_DAYS: i64 = 35;

/// The fiscal year number containing `date`.
///
/// # Errors
///
/// Returns [`FiscalError::DateBeforeAnchor`] if `date` precedes the first
/// fiscal year.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fiscal_engine::year_for_date;
///
/// let christmas = Utc.with_ymd_and_hms(2023, 12, 25, 12, 0, 0).unwrap();
/// assert_eq!(year_for_date(christmas).unwrap(), 2024);
/// ```
pub fn year_for_date(date: DateTime<Utc>) -> Result<i32> {
    Ok(containing_year(date)?.number)
}

/// The fiscal year and quarter (1-4) containing `date`.
///
/// # Errors
///
/// Returns [`FiscalError::DateBeforeAnchor`] if `date` precedes the first
/// fiscal year.
pub fn quarter_for_date(date: DateTime<Utc>) -> Result<(i32, u32)> {
    let year = containing_year(date)?;
    let seed = 1 + whole_days_since(year.start, date) / LONGEST_QUARTER_DAYS;

    probe(date, seed, QUARTERS_PER_YEAR, |q| {
        let quarter = year.quarter(q as i32);
        (quarter.start, quarter.end)
    })
    .map(|q| (year.number, q))
    .ok_or_else(|| FiscalError::Unclassified {
        date: date.to_rfc3339(),
        unit: "quarter",
    })
}

/// The fiscal year and period (1-12) containing `date`.
///
/// # Errors
///
/// Returns [`FiscalError::DateBeforeAnchor`] if `date` precedes the first
/// fiscal year.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fiscal_engine::period_for_date;
///
/// let date = Utc.with_ymd_and_hms(2024, 4, 15, 9, 30, 0).unwrap();
/// assert_eq!(period_for_date(date).unwrap(), (2024, 7));
/// ```
pub fn period_for_date(date: DateTime<Utc>) -> Result<(i32, u32)> {
    let year = containing_year(date)?;
    let seed = 1 + whole_days_since(year.start, date) / LONGEST_PERIOD_DAYS;

    probe(date, seed, PERIODS_PER_YEAR, |p| {
        let period = year.period(p as i32);
        (period.start, period.end)
    })
    .map(|p| (year.number, p))
    .ok_or_else(|| FiscalError::Unclassified {
        date: date.to_rfc3339(),
        unit: "period",
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Resolve the fiscal year containing `date`.
fn containing_year(date: DateTime<Utc>) -> Result<FiscalYear> {
    if date < anchor() {
        return Err(FiscalError::DateBeforeAnchor(date.to_rfc3339()));
    }

    let year = resolve_year(date.year().max(FIRST_FISCAL_YEAR))?;
    if year.end < date {
        year.next()
    } else {
        Ok(year)
    }
}

/// Whole days from `start` to `date`, after rounding to the nearest hour.
fn whole_days_since(start: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    let elapsed = date - start;
    (elapsed + chrono::Duration::minutes(30)).num_hours() / 24
}

/// Find the index in `1..=last` whose `[start, end]` range contains `date`,
/// starting from `seed`.
fn probe(
    date: DateTime<Utc>,
    seed: i64,
    last: u32,
    bounds: impl Fn(u32) -> (DateTime<Utc>, DateTime<Utc>),
) -> Option<u32> {
    let mut index = seed.clamp(1, i64::from(last)) as u32;
    while index > 1 && bounds(index).0 > date {
        debug!(index, %date, "index estimate overshot, stepping back");
        index -= 1;
    }

    (index..=last).find(|&i| {
        let (start, end) = bounds(i);
        start <= date && date <= end
    })
}
