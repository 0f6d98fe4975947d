//! Async inventory service.
//!
//! Wraps the shared [`Database`] handle and fires the [`ChangeNotifier`] once
//! after every successful mutation, whichever repository performed it.

use std::sync::Arc;

use pantry_store::{Database, Item, Location};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::notifier::{ChangeNotifier, Subscription};

/// The database handle shared by every async service.
pub type SharedDatabase = Arc<Mutex<Database>>;

#[derive(Clone)]
pub struct Inventory {
    db: SharedDatabase,
    notifier: ChangeNotifier,
}

impl Inventory {
    pub fn new(db: SharedDatabase, notifier: ChangeNotifier) -> Self {
        Self { db, notifier }
    }

    /// Register a listener for inventory changes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    async fn read<T>(&self, op: impl FnOnce(&Database) -> pantry_store::Result<T>) -> Result<T> {
        let db = self.db.lock().await;
        Ok(op(&db)?)
    }

    /// Run a write, then notify once the lock is released.
    async fn write<T>(&self, op: impl FnOnce(&Database) -> pantry_store::Result<T>) -> Result<T> {
        let out = {
            let db = self.db.lock().await;
            op(&db)?
        };
        self.notifier.notify();
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        self.read(Database::list_items).await
    }

    pub async fn get_item(&self, id: i64) -> Result<Item> {
        self.read(|db| db.get_item(id)).await
    }

    pub async fn add_or_increment_item(
        &self,
        name: &str,
        location_id: Option<i64>,
        min_qty: u32,
    ) -> Result<Item> {
        self.write(|db| db.add_or_increment_item(name, location_id, min_qty))
            .await
    }

    pub async fn change_quantity(&self, id: i64, delta: i64) -> Result<Item> {
        self.write(|db| db.change_quantity(id, delta)).await
    }

    pub async fn update_item(
        &self,
        id: i64,
        name: &str,
        min_qty: u32,
        location_id: Option<i64>,
    ) -> Result<Item> {
        self.write(|db| db.update_item(id, name, min_qty, location_id))
            .await
    }

    pub async fn delete_item(&self, id: i64) -> Result<bool> {
        self.write(|db| db.delete_item(id)).await
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        self.read(Database::list_locations).await
    }

    pub async fn get_location(&self, id: i64) -> Result<Location> {
        self.read(|db| db.get_location(id)).await
    }

    pub async fn count_items_at(&self, id: i64) -> Result<i64> {
        self.read(|db| db.count_items_at(id)).await
    }

    pub async fn add_location(&self, name: &str) -> Result<Location> {
        self.write(|db| db.add_location(name)).await
    }

    pub async fn rename_location(&self, id: i64, name: &str) -> Result<Location> {
        self.write(|db| db.rename_location(id, name)).await
    }

    /// Delete a location; refused while items still reference it.
    pub async fn delete_location(&self, id: i64) -> Result<bool> {
        self.write(|db| db.delete_location(id)).await
    }
}
