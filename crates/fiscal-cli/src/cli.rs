use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

/// Fiscal calendar lookups.
#[derive(Parser)]
#[command(
    name = "fiscal",
    version,
    about = "52/53-week fiscal calendar: boundaries and date classification"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Show the boundaries of a fiscal year.
    Year(YearArgs),
    /// Show the boundaries of a fiscal quarter.
    Quarter(QuarterArgs),
    /// Show the boundaries of a fiscal period.
    Period(PeriodArgs),
    /// Find the fiscal year, quarter and period containing a date.
    Classify(ClassifyArgs),
    /// List every quarter and period of a fiscal year.
    Calendar(YearArgs),
}

/// Arguments for the `year` and `calendar` subcommands.
#[derive(clap::Args)]
pub struct YearArgs {
    /// Fiscal year number (2006 or later).
    #[arg(allow_negative_numbers = true)]
    pub year: i32,
}

/// Arguments for the `quarter` subcommand.
#[derive(clap::Args)]
pub struct QuarterArgs {
    /// Fiscal year number (2006 or later).
    #[arg(allow_negative_numbers = true)]
    pub year: i32,

    /// Quarter index; values outside 1-4 are clamped.
    #[arg(allow_negative_numbers = true)]
    pub quarter: i32,
}

/// Arguments for the `period` subcommand.
#[derive(clap::Args)]
pub struct PeriodArgs {
    /// Fiscal year number (2006 or later).
    #[arg(allow_negative_numbers = true)]
    pub year: i32,

    /// Period index; values outside 1-12 are clamped.
    #[arg(allow_negative_numbers = true)]
    pub period: i32,
}

/// Arguments for the `classify` subcommand.
#[derive(clap::Args)]
pub struct ClassifyArgs {
    /// Date as YYYY-MM-DD (midnight UTC) or RFC 3339. Defaults to now.
    #[arg(value_parser = parse_instant)]
    pub date: Option<DateTime<Utc>>,
}

/// Parse a `YYYY-MM-DD` date or an RFC 3339 datetime into a UTC instant.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("'{s}' is neither YYYY-MM-DD nor RFC 3339"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_plain_date_is_midnight_utc() {
        let parsed = parse_instant("2024-03-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offset() {
        let parsed = parse_instant("2024-03-15T02:00:00+05:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 14, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_instant("next tuesday").is_err());
        assert!(parse_instant("2024-13-01").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
