//! # fiscal-engine
//!
//! Deterministic 52/53-week retail fiscal calendar computation.
//!
//! Fiscal years are anchored to a fixed historical start (2005-09-25, the
//! first day of fiscal year 2006) and are 52 or 53 weeks long. Each year has
//! four quarters of three periods each; periods follow a 5-4-4 week pattern,
//! and the leap week of a 53-week year is absorbed by the third period of the
//! first quarter.
//!
//! All instants are UTC with nanosecond precision. A range's `end` is the
//! last nanosecond before the next range starts.
//!
//! ## Modules
//!
//! - [`year`] — Fiscal year boundaries, walked forward from the anchor
//! - [`quarter`] — Quarter boundaries within a fiscal year
//! - [`period`] — Period (roughly monthly) boundaries within a fiscal year
//! - [`classify`] — Instant → containing fiscal year, quarter or period
//! - [`error`] — Error types

pub mod classify;
pub mod error;
pub mod period;
pub mod quarter;
pub mod year;

pub use classify::{period_for_date, quarter_for_date, year_for_date};
pub use error::{FiscalError, Result};
pub use period::{resolve_period, FiscalPeriod, PERIODS_PER_QUARTER, PERIODS_PER_YEAR};
pub use quarter::{resolve_quarter, FiscalQuarter, QUARTERS_PER_YEAR};
pub use year::{
    anchor, fiscal_years, resolve_year, FiscalYear, FiscalYears, ANCHOR_UNIX_NANOS,
    FIRST_FISCAL_YEAR,
};
