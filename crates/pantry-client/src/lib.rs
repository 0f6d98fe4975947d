//! # pantry-client
//!
//! Async application core for the Pantry household inventory: the inventory
//! service and its change notifications, daily reminder reconciliation, and
//! the read-side running-low views. Presentation layers consume [`Pantry`].

pub mod app;
pub mod config;
pub mod error;
pub mod inventory;
pub mod low_stock;
pub mod notifier;
pub mod reminders;
pub mod scheduler;

use tracing_subscriber::{fmt, EnvFilter};

pub use app::Pantry;
pub use config::ClientConfig;
pub use error::{ClientError, Result, SchedulerError};
pub use notifier::{ChangeNotifier, Subscription};
pub use reminders::{FireOutcome, ReconcileOutcome};
pub use scheduler::{DisabledScheduler, LogScheduler, NotificationScheduler};

/// Install the global `tracing` subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pantry_client=info,pantry_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
