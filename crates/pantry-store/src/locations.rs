//! CRUD operations for [`Location`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{is_constraint, require_name, Database};
use crate::error::{Result, StoreError};
use crate::models::Location;
use crate::timestamps;

const SELECT_LOCATION: &str = "SELECT id, name, created_at, updated_at FROM locations";

impl Database {
    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All locations, ordered by name ascending.
    pub fn list_locations(&self) -> Result<Vec<Location>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT_LOCATION} ORDER BY name ASC"))?;
        let rows = stmt.query_map([], row_to_location)?;

        let mut locations = Vec::new();
        for row in rows {
            locations.push(row?);
        }
        Ok(locations)
    }

    /// Fetch a single location by id.
    pub fn get_location(&self, id: i64) -> Result<Location> {
        self.conn()
            .query_row(
                &format!("{SELECT_LOCATION} WHERE id = ?1"),
                params![id],
                row_to_location,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(format!("location {id}")),
                other => StoreError::Sqlite(other),
            })
    }

    /// Number of items currently stored at `id`.
    pub fn count_items_at(&self, id: i64) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(1) FROM items WHERE location_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Create / update
    // ------------------------------------------------------------------

    /// Add a location by name. Re-adding an existing name only touches its
    /// `updated_at`, so the call is idempotent.
    pub fn add_location(&self, name: &str) -> Result<Location> {
        let name = require_name(name, "location")?;
        let now = timestamps::now();

        let existing: Option<i64> = self
            .conn()
            .query_row(
                "SELECT id FROM locations WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => {
                self.conn().execute(
                    "UPDATE locations SET updated_at = ?1 WHERE id = ?2",
                    params![now, id],
                )?;
                tracing::debug!(id, name, "location already exists, touched");
                id
            }
            None => {
                self.conn().execute(
                    "INSERT INTO locations (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
                    params![name, now],
                )?;
                let id = self.conn().last_insert_rowid();
                tracing::debug!(id, name, "location created");
                id
            }
        };

        self.get_location(id)
    }

    /// Rename a location. Renaming onto another location's name is rejected.
    pub fn rename_location(&self, id: i64, name: &str) -> Result<Location> {
        let name = require_name(name, "location")?;

        let updated = self
            .conn()
            .execute(
                "UPDATE locations SET name = ?1, updated_at = ?2 WHERE id = ?3",
                params![name, timestamps::now(), id],
            )
            .map_err(|e| {
                if is_constraint(&e, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) {
                    StoreError::Validation(format!("location {name:?} already exists"))
                } else {
                    StoreError::Sqlite(e)
                }
            })?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("location {id}")));
        }
        tracing::debug!(id, name, "location renamed");
        self.get_location(id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a location.  Returns `true` if a row was deleted.
    ///
    /// Refused with [`StoreError::ReferentialIntegrity`] while any item still
    /// references the location; the `ON DELETE RESTRICT` foreign key backs
    /// this up at the storage level.
    pub fn delete_location(&self, id: i64) -> Result<bool> {
        let item_count = self.count_items_at(id)?;
        if item_count > 0 {
            return Err(StoreError::ReferentialIntegrity {
                location_id: id,
                item_count,
            });
        }

        let affected = self
            .conn()
            .execute("DELETE FROM locations WHERE id = ?1", params![id])
            .map_err(|e| {
                if is_constraint(&e, rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                    StoreError::ReferentialIntegrity {
                        location_id: id,
                        item_count: self.count_items_at(id).unwrap_or(0),
                    }
                } else {
                    StoreError::Sqlite(e)
                }
            })?;

        tracing::debug!(id, deleted = affected > 0, "location delete");
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Location`].
fn row_to_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: timestamps::column(row, 2)?,
        updated_at: timestamps::column(row, 3)?,
    })
}
