//! Error types for fiscal-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FiscalError {
    #[error("Fiscal year {year} precedes the first fiscal year {first}")]
    YearBeforeAnchor { year: i32, first: i32 },

    #[error("Date precedes the fiscal calendar anchor: {0}")]
    DateBeforeAnchor(String),

    #[error("Fiscal year {year} is outside the representable date range")]
    YearOutOfRange { year: i32 },

    #[error("No fiscal {unit} contains {date}")]
    Unclassified { date: String, unit: &'static str },
}

pub type Result<T> = std::result::Result<T, FiscalError>;
