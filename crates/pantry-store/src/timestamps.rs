//! Local wall-clock timestamps as stored in TEXT columns.
//!
//! Values are written with microsecond precision so they sort correctly as
//! plain strings. Rows written by SQLite's own `datetime('now','localtime')`
//! default carry no fraction and still parse.

use chrono::{Local, NaiveDateTime};

const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Current local time formatted for storage.
pub(crate) fn now() -> String {
    Local::now().naive_local().format(WRITE_FORMAT).to_string()
}

/// Read a timestamp column, reporting failures as a conversion error on `idx`.
pub(crate) fn column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, READ_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
