//! Text column encodings shared by the SQLite adapters.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed-width RFC 3339 so text ordering matches chronological ordering.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, SQLite's `YYYY-MM-DD HH:MM:SS`, or a bare date taken
/// as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, SQLITE_DATETIME_FORMAT) {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(column: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| Error::Parse(format!("{column}: {raw:?}: {e}")))
}

pub fn parse_decimal(column: &'static str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| Error::Parse(format!("{column}: {raw:?}: {e}")))
}

pub fn parse_optional_decimal(column: &'static str, raw: Option<&str>) -> Result<Option<Decimal>> {
    raw.map(|value| parse_decimal(column, value)).transpose()
}
