//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per table; all public functions are re-exported here.
//! Dates are stored as ISO-8601 text, UUIDs as hyphenated strings.

mod appointment;
mod consultation;
mod patient;
mod user;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use rusqlite::types::Type;
use uuid::Uuid;

pub use appointment::*;
pub use consultation::*;
pub use patient::*;
pub use user::*;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Reads a required UUID column.
pub fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// Reads a required `YYYY-MM-DD` column.
pub fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

/// Reads an optional date column. Malformed values read as absent.
pub fn optional_date_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDate>> {
    Ok(row
        .get::<_, Option<String>>(idx)?
        .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()))
}

/// Reads a required `YYYY-MM-DD HH:MM:SS` column.
pub fn datetime_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(|e| conversion_error(idx, e))
}

/// Current local time truncated to the precision stored in the database.
pub fn now_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}
