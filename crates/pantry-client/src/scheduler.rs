//! The platform notification collaborator.
//!
//! The core never talks to an OS notification API directly. It only needs
//! the four primitives of [`NotificationScheduler`]; platform shells supply
//! the real implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use crate::error::SchedulerError;

/// Schedules and cancels local notifications.
///
/// Handles are opaque strings chosen by the implementation. The core keeps
/// the handles it created because it cannot enumerate scheduled
/// notifications by itself.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Check for notification permission, requesting it if not yet granted.
    async fn ensure_permission(&self) -> bool;

    /// Schedule a notification repeating every day at `hour:minute`.
    async fn schedule_daily(
        &self,
        hour: u32,
        minute: u32,
        title: &str,
        body: &str,
    ) -> Result<String, SchedulerError>;

    /// Deliver a single notification right away.
    async fn schedule_once(&self, title: &str, body: &str) -> Result<String, SchedulerError>;

    /// Cancel a scheduled notification. Unknown or already-fired handles are
    /// ignored.
    async fn cancel(&self, handle: &str);
}

/// Scheduler for platforms without any notification capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledScheduler;

#[async_trait]
impl NotificationScheduler for DisabledScheduler {
    async fn ensure_permission(&self) -> bool {
        false
    }

    async fn schedule_daily(
        &self,
        _hour: u32,
        _minute: u32,
        _title: &str,
        _body: &str,
    ) -> Result<String, SchedulerError> {
        Err(SchedulerError("notifications are not supported".into()))
    }

    async fn schedule_once(&self, _title: &str, _body: &str) -> Result<String, SchedulerError> {
        Err(SchedulerError("notifications are not supported".into()))
    }

    async fn cancel(&self, _handle: &str) {}
}

/// A notification held by [`LogScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    /// `Some((hour, minute))` for daily notifications, `None` for one-shots.
    pub daily_at: Option<(u32, u32)>,
    pub title: String,
    pub body: String,
}

/// Desktop fallback: keeps schedules in memory for the life of the process
/// and writes every delivery to the log.
#[derive(Debug, Default)]
pub struct LogScheduler {
    next_id: AtomicU64,
    scheduled: Mutex<BTreeMap<String, ScheduledNotification>>,
}

impl LogScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the currently scheduled daily notifications.
    pub fn scheduled(&self) -> BTreeMap<String, ScheduledNotification> {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_handle(&self, kind: &str) -> String {
        format!("{kind}-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl NotificationScheduler for LogScheduler {
    async fn ensure_permission(&self) -> bool {
        true
    }

    async fn schedule_daily(
        &self,
        hour: u32,
        minute: u32,
        title: &str,
        body: &str,
    ) -> Result<String, SchedulerError> {
        let handle = self.next_handle("daily");
        info!(%handle, "{hour:02}:{minute:02} daily: {title}: {body}");
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                handle.clone(),
                ScheduledNotification {
                    daily_at: Some((hour, minute)),
                    title: title.to_string(),
                    body: body.to_string(),
                },
            );
        Ok(handle)
    }

    async fn schedule_once(&self, title: &str, body: &str) -> Result<String, SchedulerError> {
        let handle = self.next_handle("once");
        info!(%handle, "{title}: {body}");
        Ok(handle)
    }

    async fn cancel(&self, handle: &str) {
        let removed = self
            .scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(handle);
        if removed.is_some() {
            info!(%handle, "daily notification cancelled");
        }
    }
}
