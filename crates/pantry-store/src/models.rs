//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a UI layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A named place where items are stored ("Fridge", "Bathroom cabinet").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// Row id assigned by SQLite.
    pub id: i64,
    /// Unique, trimmed display name.
    pub name: String,
    /// Local wall-clock time the row was created.
    pub created_at: NaiveDateTime,
    /// Local wall-clock time of the last rename or re-add.
    pub updated_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A tracked household item, joined with the name of its location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Row id assigned by SQLite.
    pub id: i64,
    /// Unique, trimmed display name.
    pub name: String,
    /// Units on hand. Never negative.
    pub qty: u32,
    /// Low-stock threshold; 0 disables alerting for this item.
    pub min_qty: u32,
    /// Optional storage location.
    pub location_id: Option<i64>,
    /// Name of the location, if any (from the join).
    pub location_name: Option<String>,
    pub created_at: NaiveDateTime,
    /// Advances on every mutation, quantity changes included.
    pub updated_at: NaiveDateTime,
}

impl Item {
    /// `qty < min_qty` with a non-zero threshold.
    pub fn is_low_stock(&self) -> bool {
        self.min_qty > 0 && self.qty < self.min_qty
    }

    /// How many units short of the threshold this item is (0 when not low).
    pub fn deficit(&self) -> u32 {
        self.min_qty.saturating_sub(self.qty)
    }
}
