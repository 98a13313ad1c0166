//! Subcommand implementations. Each returns the rendered output.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fiscal_engine::{
    period_for_date, quarter_for_date, resolve_period, resolve_quarter, resolve_year,
    FiscalPeriod, FiscalQuarter, FiscalYear,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{ClassifyArgs, PeriodArgs, QuarterArgs, YearArgs};

/// Output rendering selected by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// A fiscal year with its derived week count.
#[derive(Debug, Serialize)]
struct YearReport {
    #[serde(flatten)]
    year: FiscalYear,
    weeks: i64,
    leap: bool,
}

/// Where a date falls in the fiscal calendar.
#[derive(Debug, Serialize)]
struct Classification {
    date: DateTime<Utc>,
    year: i32,
    quarter: u32,
    period: u32,
}

/// Every quarter and period of one fiscal year.
#[derive(Debug, Serialize)]
struct CalendarReport {
    #[serde(flatten)]
    year: YearReport,
    quarters: Vec<FiscalQuarter>,
    periods: Vec<FiscalPeriod>,
}

pub fn year(args: YearArgs, format: Format) -> Result<String> {
    let report = year_report(args.year)?;
    render(&report, format, year_line)
}

pub fn quarter(args: QuarterArgs, format: Format) -> Result<String> {
    let quarter = resolve_quarter(args.year, args.quarter)
        .with_context(|| format!("wrong fiscal year {}", args.year))?;
    if i64::from(args.quarter) != i64::from(quarter.quarter) {
        info!(requested = args.quarter, used = quarter.quarter, "quarter index clamped");
    }
    render(&quarter, format, quarter_line)
}

pub fn period(args: PeriodArgs, format: Format) -> Result<String> {
    let period = resolve_period(args.year, args.period)
        .with_context(|| format!("wrong fiscal year {}", args.year))?;
    if i64::from(args.period) != i64::from(period.period) {
        info!(requested = args.period, used = period.period, "period index clamped");
    }
    render(&period, format, period_line)
}

pub fn classify(args: ClassifyArgs, format: Format) -> Result<String> {
    let date = args.date.unwrap_or_else(Utc::now);
    debug!(%date, "classifying");

    let (year, quarter) =
        quarter_for_date(date).with_context(|| format!("cannot classify {date}"))?;
    let (_, period) = period_for_date(date).with_context(|| format!("cannot classify {date}"))?;

    let classification = Classification {
        date,
        year,
        quarter,
        period,
    };
    render(&classification, format, |c| {
        format!(
            "{}  FY{} Q{} P{:02}",
            c.date.to_rfc3339(),
            c.year,
            c.quarter,
            c.period
        )
    })
}

pub fn calendar(args: YearArgs, format: Format) -> Result<String> {
    let year = year_report(args.year)?;
    let report = CalendarReport {
        quarters: year.year.quarters().collect(),
        periods: year.year.periods().collect(),
        year,
    };
    render(&report, format, |r| {
        let mut lines = vec![year_line(&r.year)];
        for quarter in &r.quarters {
            lines.push(format!("  {}", quarter_line(quarter)));
            for period in r.periods.iter().filter(|p| p.quarter() == quarter.quarter) {
                lines.push(format!("    {}", period_line(period)));
            }
        }
        lines.join("\n")
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn year_report(number: i32) -> Result<YearReport> {
    let year = resolve_year(number).with_context(|| format!("wrong fiscal year {number}"))?;
    Ok(YearReport {
        weeks: year.length_days() / 7,
        leap: year.is_leap(),
        year,
    })
}

fn render<T: Serialize>(value: &T, format: Format, text: impl Fn(&T) -> String) -> Result<String> {
    match format {
        Format::Text => Ok(text(value)),
        Format::Json => serde_json::to_string_pretty(value).context("serializing output"),
    }
}

fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{} .. {}", start.date_naive(), end.date_naive())
}

fn weeks(days: i64) -> String {
    format!("{} weeks", days / 7)
}

fn year_line(r: &YearReport) -> String {
    format!(
        "FY{}  {}  {}",
        r.year.number,
        span(r.year.start, r.year.end),
        weeks(r.year.length_days())
    )
}

fn quarter_line(q: &FiscalQuarter) -> String {
    format!(
        "FY{} Q{}  {}  {}",
        q.year,
        q.quarter,
        span(q.start, q.end),
        weeks(q.length_days())
    )
}

fn period_line(p: &FiscalPeriod) -> String {
    format!(
        "FY{} P{:02}  {}  {}",
        p.year,
        p.period,
        span(p.start, p.end),
        weeks(p.length_days())
    )
}
