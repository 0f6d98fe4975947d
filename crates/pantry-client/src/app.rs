//! Composition root.
//!
//! [`Pantry`] owns the single [`ChangeNotifier`] and the shared database
//! handle, and wires them into the inventory service and the reminder
//! reconciler. A UI layer holds one `Pantry` and talks to nothing else.

use std::sync::Arc;

use chrono::Local;
use pantry_shared::ReminderTime;
use pantry_store::{Database, Item};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::inventory::{Inventory, SharedDatabase};
use crate::low_stock::{
    low_stock_items, low_stock_message, recent_items, suggest_items, LowStockQuery,
};
use crate::notifier::ChangeNotifier;
use crate::reminders::{FireOutcome, ReconcileOutcome, Reminders};
use crate::scheduler::NotificationScheduler;

pub struct Pantry {
    config: ClientConfig,
    notifier: ChangeNotifier,
    inventory: Inventory,
    reminders: Reminders,
}

impl Pantry {
    /// Open the configured store (running the schema manager) and wire up
    /// the services. A store that cannot be initialized is fatal.
    pub fn open(config: ClientConfig, scheduler: Arc<dyn NotificationScheduler>) -> Result<Self> {
        let db = match &config.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        Ok(Self::with_database(db, config, scheduler))
    }

    pub fn with_database(
        db: Database,
        config: ClientConfig,
        scheduler: Arc<dyn NotificationScheduler>,
    ) -> Self {
        let db: SharedDatabase = Arc::new(Mutex::new(db));
        let notifier = ChangeNotifier::new();
        let inventory = Inventory::new(Arc::clone(&db), notifier.clone());
        let reminders = Reminders::new(db, scheduler, config.notification_title.clone());

        Self {
            config,
            notifier,
            inventory,
            reminders,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn reminders(&self) -> &Reminders {
        &self.reminders
    }

    /// Re-establish the daily reminders from the stored times. Run once at
    /// startup; a previous run may have been interrupted mid-reconcile.
    pub async fn start(&self) -> Result<ReconcileOutcome> {
        let times = self.reminders.reminder_times().await?;
        info!(times = ?times, "restoring daily reminders");
        self.reminders
            .reconcile(&times, &self.config.reminder_body)
            .await
    }

    /// Items below their threshold, largest shortfall first.
    pub async fn low_stock(&self) -> Result<Vec<Item>> {
        let items = self.inventory.list_items().await?;
        Ok(low_stock_items(&items, &LowStockQuery::default()))
    }

    /// Existing items matching a partially typed name, for completion.
    pub async fn suggest(&self, query: &str) -> Result<Vec<Item>> {
        let items = self.inventory.list_items().await?;
        Ok(suggest_items(&items, query))
    }

    /// Items created during the last week, newest first.
    pub async fn recent(&self) -> Result<Vec<Item>> {
        let items = self.inventory.list_items().await?;
        Ok(recent_items(&items, Local::now().naive_local()))
    }

    /// Send the current running-low list as an immediate notification.
    pub async fn notify_low_stock_now(&self) -> Result<FireOutcome> {
        let low = self.low_stock().await?;
        self.reminders.fire_once(&low_stock_message(&low)).await
    }

    pub async fn set_reminder_times<I, S>(&self, times: I) -> Result<(Vec<String>, ReconcileOutcome)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reminders
            .set_reminder_times(times, &self.config.reminder_body)
            .await
    }

    pub async fn add_reminder_time(&self, time: ReminderTime) -> Result<(Vec<String>, ReconcileOutcome)> {
        self.reminders
            .add_reminder_time(time, &self.config.reminder_body)
            .await
    }

    pub async fn remove_reminder_time(
        &self,
        time: ReminderTime,
    ) -> Result<(Vec<String>, ReconcileOutcome)> {
        self.reminders
            .remove_reminder_time(time, &self.config.reminder_body)
            .await
    }
}
