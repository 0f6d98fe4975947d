//! CRUD operations for [`Item`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{is_constraint, require_name, Database};
use crate::error::{Result, StoreError};
use crate::models::Item;
use crate::timestamps;

const SELECT_ITEM: &str = "SELECT items.id, items.name, items.qty, items.min_qty,
            items.location_id, locations.name,
            items.created_at, items.updated_at
     FROM items
     LEFT JOIN locations ON items.location_id = locations.id";

impl Database {
    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All items with their location name, most recently touched first.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT_ITEM} ORDER BY items.updated_at DESC, items.id DESC"
        ))?;
        let rows = stmt.query_map([], row_to_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Fetch a single item by id.
    pub fn get_item(&self, id: i64) -> Result<Item> {
        self.conn()
            .query_row(
                &format!("{SELECT_ITEM} WHERE items.id = ?1"),
                params![id],
                row_to_item,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(format!("item {id}")),
                other => StoreError::Sqlite(other),
            })
    }

    // ------------------------------------------------------------------
    // Create / update
    // ------------------------------------------------------------------

    /// Add one unit of `name`.
    ///
    /// A new name is inserted with `qty = 1`. An existing name gains one unit
    /// and takes `min_qty` and `location_id` from this call, so re-adding an
    /// item restocks it and updates its metadata in one step.
    pub fn add_or_increment_item(
        &self,
        name: &str,
        location_id: Option<i64>,
        min_qty: u32,
    ) -> Result<Item> {
        let name = require_name(name, "item")?;
        self.require_location(location_id)?;

        let tx = self.conn().unchecked_transaction()?;
        let now = timestamps::now();

        let existing: Option<(i64, u32)> = tx
            .query_row(
                "SELECT id, qty FROM items WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let id = match existing {
            Some((id, qty)) => {
                tx.execute(
                    "UPDATE items
                     SET qty = ?1, min_qty = ?2, location_id = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![qty.saturating_add(1), min_qty, location_id, now, id],
                )?;
                tracing::debug!(id, name, qty = qty.saturating_add(1), "item restocked");
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO items (name, qty, min_qty, location_id, created_at, updated_at)
                     VALUES (?1, 1, ?2, ?3, ?4, ?4)",
                    params![name, min_qty, location_id, now],
                )?;
                let id = tx.last_insert_rowid();
                tracing::debug!(id, name, "item created");
                id
            }
        };

        tx.commit()?;
        self.get_item(id)
    }

    /// Add `delta` units (negative to consume). The quantity is clamped at 0.
    pub fn change_quantity(&self, id: i64, delta: i64) -> Result<Item> {
        let tx = self.conn().unchecked_transaction()?;

        let qty: u32 = tx
            .query_row("SELECT qty FROM items WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("item {id}")))?;

        let next = i64::from(qty)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));

        tx.execute(
            "UPDATE items SET qty = ?1, updated_at = ?2 WHERE id = ?3",
            params![next, timestamps::now(), id],
        )?;
        tx.commit()?;

        tracing::debug!(id, delta, qty = next, "item quantity changed");
        self.get_item(id)
    }

    /// Overwrite every mutable field of an item.
    pub fn update_item(
        &self,
        id: i64,
        name: &str,
        min_qty: u32,
        location_id: Option<i64>,
    ) -> Result<Item> {
        let name = require_name(name, "item")?;
        self.require_location(location_id)?;

        let updated = self
            .conn()
            .execute(
                "UPDATE items
                 SET name = ?1, min_qty = ?2, location_id = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![name, min_qty, location_id, timestamps::now(), id],
            )
            .map_err(|e| {
                if is_constraint(&e, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) {
                    StoreError::Validation(format!("item {name:?} already exists"))
                } else {
                    StoreError::Sqlite(e)
                }
            })?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("item {id}")));
        }
        tracing::debug!(id, name, "item updated");
        self.get_item(id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete an item by id.  Returns `true` if a row was deleted.
    pub fn delete_item(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        tracing::debug!(id, deleted = affected > 0, "item delete");
        Ok(affected > 0)
    }

    fn require_location(&self, location_id: Option<i64>) -> Result<()> {
        match location_id {
            Some(id) => self.get_location(id).map(|_| ()),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to an [`Item`].
fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        qty: row.get(2)?,
        min_qty: row.get(3)?,
        location_id: row.get(4)?,
        location_name: row.get(5)?,
        created_at: timestamps::column(row, 6)?,
        updated_at: timestamps::column(row, 7)?,
    })
}
