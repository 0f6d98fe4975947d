use std::sync::Arc;

use anyhow::Context;
use pantry_client::{ClientConfig, LogScheduler, Pantry, ReconcileOutcome};
use pantry_shared::constants::APP_NAME;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pantry_client::init_tracing();

    // -----------------------------------------------------------------------
    // 1. Load configuration
    // -----------------------------------------------------------------------
    let config = ClientConfig::from_env();
    info!(db_path = ?config.db_path, "Starting {APP_NAME}");

    // -----------------------------------------------------------------------
    // 2. Open the store; nothing else runs if the schema cannot be set up
    // -----------------------------------------------------------------------
    let pantry = Pantry::open(config, Arc::new(LogScheduler::new()))
        .context("failed to initialize the inventory store")?;

    // -----------------------------------------------------------------------
    // 3. Restore daily reminders
    // -----------------------------------------------------------------------
    match pantry.start().await? {
        ReconcileOutcome::Scheduled(handles) => {
            info!(count = handles.len(), "daily reminders active");
        }
        ReconcileOutcome::PermissionUnavailable => {
            warn!("notifications unavailable, reminders disabled");
        }
    }

    // -----------------------------------------------------------------------
    // 4. Report what is running low
    // -----------------------------------------------------------------------
    let items = pantry.inventory().list_items().await?;
    let low = pantry.low_stock().await?;
    info!(items = items.len(), low = low.len(), "inventory loaded");

    for item in &low {
        info!(
            name = %item.name,
            qty = item.qty,
            min_qty = item.min_qty,
            location = item.location_name.as_deref().unwrap_or("-"),
            "running low"
        );
    }

    Ok(())
}
