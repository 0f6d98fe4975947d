//! Schema manager.
//!
//! [`ensure_schema`] runs on every [`Database`](crate::Database) open. Versioned
//! migrations are guarded by the `user_version` pragma so each runs exactly
//! once; the additive column backfill runs every time because stores created
//! by older releases may predate the version counter entirely. Nothing here
//! ever drops or renames a column.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.  Bump this and add a new migration module whenever
/// the schema changes.
const CURRENT_VERSION: u32 = 1;

/// Columns that later releases added to `items`, with the DDL used to add them.
const ITEM_COLUMNS: &[(&str, &str)] = &[
    (
        "location_id",
        "ALTER TABLE items ADD COLUMN location_id INTEGER REFERENCES locations(id)",
    ),
    (
        "min_qty",
        "ALTER TABLE items ADD COLUMN min_qty INTEGER NOT NULL DEFAULT 0",
    ),
];

/// Bring the open connection up to the current schema.
///
/// Safe to call any number of times against a store of any prior version.
/// Failures are reported as [`StoreError::Initialization`].
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    run_migrations(conn).map_err(|e| match e {
        e @ StoreError::Initialization(_) => e,
        other => StoreError::Initialization(other.to_string()),
    })
}

fn run_migrations(conn: &Connection) -> Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        current_version = current,
        target_version = CURRENT_VERSION,
        "checking database migrations"
    );

    if current < 1 {
        tracing::info!("applying migration v001_initial");
        v001_initial::up(conn).map_err(|e| StoreError::Initialization(e.to_string()))?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    backfill_item_columns(conn)?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_items_location_id ON items(location_id);",
    )?;

    Ok(())
}

/// Add any `items` column the current table lacks.
fn backfill_item_columns(conn: &Connection) -> Result<()> {
    let existing = item_columns(conn)?;

    for (column, ddl) in ITEM_COLUMNS {
        if !existing.iter().any(|c| c == *column) {
            tracing::info!(column, "adding missing items column");
            conn.execute_batch(ddl)?;
        }
    }

    Ok(())
}

fn item_columns(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(items)")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}
