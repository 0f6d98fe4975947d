//! Daily reminder reconciliation.
//!
//! The platform scheduler offers only schedule-one and cancel-one, and cannot
//! list what is scheduled. [`Reminders`] therefore keeps the handles it
//! created in the settings table and, on every change, replaces the whole
//! set: cancel every known handle, schedule every desired time, then
//! overwrite the stored handle list. Because the list is overwritten rather
//! than appended, an interrupted run can at worst leave stale handles behind,
//! never a growing pile of live schedules.

use std::collections::BTreeSet;
use std::sync::Arc;

use pantry_shared::ReminderTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::inventory::SharedDatabase;
use crate::scheduler::NotificationScheduler;

/// Result of [`Reminders::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReconcileOutcome {
    /// The stored handle set now holds exactly these handles.
    Scheduled(Vec<String>),
    /// No permission or no notification support; nothing was touched.
    PermissionUnavailable,
}

/// Result of [`Reminders::fire_once`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FireOutcome {
    Sent(String),
    PermissionUnavailable,
}

pub struct Reminders {
    db: SharedDatabase,
    scheduler: Arc<dyn NotificationScheduler>,
    title: String,
}

impl Reminders {
    pub fn new(
        db: SharedDatabase,
        scheduler: Arc<dyn NotificationScheduler>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            db,
            scheduler,
            title: title.into(),
        }
    }

    // ------------------------------------------------------------------
    // Desired times
    // ------------------------------------------------------------------

    /// Configured reminder times (defaults to a single evening time).
    pub async fn reminder_times(&self) -> Result<Vec<String>> {
        Ok(self.db.lock().await.reminder_times()?)
    }

    /// Replace the configured times and reconcile the live schedule.
    ///
    /// Entries are parsed before storing, so `"8:00"` and `"08:00"` are the
    /// same time; malformed entries are dropped with a warning. Returns the
    /// stored `HH:MM` times and the reconcile outcome.
    pub async fn set_reminder_times<I, S>(
        &self,
        times: I,
        body: &str,
    ) -> Result<(Vec<String>, ReconcileOutcome)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stored = self.db.lock().await.set_reminder_times(parse_times(times))?;
        let outcome = self.reconcile(&stored, body).await?;
        Ok((stored, outcome))
    }

    pub async fn add_reminder_time(
        &self,
        time: ReminderTime,
        body: &str,
    ) -> Result<(Vec<String>, ReconcileOutcome)> {
        let mut times = self.reminder_times().await?;
        times.push(time.to_string());
        self.set_reminder_times(times, body).await
    }

    /// Drop `time` from the configured set, however it was spelled when
    /// stored.
    pub async fn remove_reminder_time(
        &self,
        time: ReminderTime,
        body: &str,
    ) -> Result<(Vec<String>, ReconcileOutcome)> {
        let times: BTreeSet<ReminderTime> = parse_times(self.reminder_times().await?)
            .into_iter()
            .filter(|t| *t != time)
            .collect();
        let stored = self.db.lock().await.set_reminder_times(times)?;
        let outcome = self.reconcile(&stored, body).await?;
        Ok((stored, outcome))
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Make the live daily schedule match `desired`.
    ///
    /// Duplicate times collapse; malformed entries and times the scheduler
    /// refuses are skipped with a warning. Storage failures propagate.
    pub async fn reconcile<I, S>(&self, desired: I, body: &str) -> Result<ReconcileOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.scheduler.ensure_permission().await {
            warn!("notification permission unavailable, reminders not scheduled");
            return Ok(ReconcileOutcome::PermissionUnavailable);
        }

        let previous = self.db.lock().await.reminder_schedule_ids()?;
        for handle in &previous {
            self.scheduler.cancel(handle).await;
        }

        let times = parse_times(desired);

        let mut handles = Vec::with_capacity(times.len());
        for time in &times {
            match self
                .scheduler
                .schedule_daily(time.hour(), time.minute(), &self.title, body)
                .await
            {
                Ok(handle) => handles.push(handle),
                Err(e) => warn!(%time, error = %e, "failed to schedule reminder"),
            }
        }

        self.db.lock().await.set_reminder_schedule_ids(&handles)?;

        info!(
            cancelled = previous.len(),
            scheduled = handles.len(),
            "daily reminders reconciled"
        );
        Ok(ReconcileOutcome::Scheduled(handles))
    }

    /// Deliver one immediate notification. The recurring handle set is left
    /// untouched.
    pub async fn fire_once(&self, body: &str) -> Result<FireOutcome> {
        if !self.scheduler.ensure_permission().await {
            warn!("notification permission unavailable, nothing sent");
            return Ok(FireOutcome::PermissionUnavailable);
        }

        let handle = self.scheduler.schedule_once(&self.title, body).await?;
        Ok(FireOutcome::Sent(handle))
    }
}

/// Parse raw `H:MM`/`HH:MM` strings into a deduplicated, chronological set.
fn parse_times<I, S>(raw: I) -> BTreeSet<ReminderTime>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|raw| match raw.as_ref().parse::<ReminderTime>() {
            Ok(time) => Some(time),
            Err(e) => {
                warn!(time = raw.as_ref(), error = %e, "skipping malformed reminder time");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use pantry_store::Database;
    use tokio::sync::Mutex;

    use super::*;
    use crate::error::{ClientError, SchedulerError};

    /// Records every call; can be told to deny permission or refuse a time.
    #[derive(Default)]
    struct RecordingScheduler {
        denied: AtomicBool,
        refuse_hour: StdMutex<Option<u32>>,
        next: AtomicU64,
        daily: StdMutex<Vec<(String, u32, u32)>>,
        once: StdMutex<Vec<String>>,
        cancelled: StdMutex<Vec<String>>,
    }

    impl RecordingScheduler {
        fn cancelled(&self) -> Vec<String> {
            self.cancelled.lock().unwrap().clone()
        }

        fn daily(&self) -> Vec<(String, u32, u32)> {
            self.daily.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationScheduler for RecordingScheduler {
        async fn ensure_permission(&self) -> bool {
            !self.denied.load(Ordering::SeqCst)
        }

        async fn schedule_daily(
            &self,
            hour: u32,
            minute: u32,
            _title: &str,
            _body: &str,
        ) -> std::result::Result<String, SchedulerError> {
            if *self.refuse_hour.lock().unwrap() == Some(hour) {
                return Err(SchedulerError("refused".into()));
            }
            let handle = format!("h{}", self.next.fetch_add(1, Ordering::SeqCst));
            self.daily.lock().unwrap().push((handle.clone(), hour, minute));
            Ok(handle)
        }

        async fn schedule_once(
            &self,
            _title: &str,
            body: &str,
        ) -> std::result::Result<String, SchedulerError> {
            self.once.lock().unwrap().push(body.to_string());
            Ok(format!("o{}", self.next.fetch_add(1, Ordering::SeqCst)))
        }

        async fn cancel(&self, handle: &str) {
            self.cancelled.lock().unwrap().push(handle.to_string());
        }
    }

    fn setup() -> (Reminders, Arc<RecordingScheduler>, SharedDatabase) {
        let db: SharedDatabase = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let scheduler = Arc::new(RecordingScheduler::default());
        let reminders = Reminders::new(Arc::clone(&db), scheduler.clone(), "Running low");
        (reminders, scheduler, db)
    }

    #[tokio::test]
    async fn test_duplicates_collapse_and_previous_handles_cancelled() {
        let (reminders, scheduler, db) = setup();
        db.lock()
            .await
            .set_reminder_schedule_ids(&["old-1".to_string(), "old-2".to_string()])
            .unwrap();

        let outcome = reminders
            .reconcile(["08:00", "08:00", "20:30"], "check")
            .await
            .unwrap();

        let ReconcileOutcome::Scheduled(handles) = outcome else {
            panic!("expected Scheduled");
        };
        assert_eq!(handles.len(), 2);
        assert_eq!(scheduler.cancelled(), vec!["old-1", "old-2"]);
        assert_eq!(db.lock().await.reminder_schedule_ids().unwrap(), handles);

        let times: Vec<(u32, u32)> = scheduler.daily().iter().map(|(_, h, m)| (*h, *m)).collect();
        assert_eq!(times, vec![(8, 0), (20, 30)]);
    }

    #[tokio::test]
    async fn test_empty_set_clears_everything() {
        let (reminders, scheduler, db) = setup();
        reminders.reconcile(["07:15"], "check").await.unwrap();

        let outcome = reminders
            .reconcile(Vec::<String>::new(), "check")
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Scheduled(vec![]));
        assert_eq!(scheduler.cancelled(), vec!["h0"]);
        assert_eq!(scheduler.daily().len(), 1);
        assert!(db.lock().await.reminder_schedule_ids().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_entries_skipped() {
        let (reminders, scheduler, _db) = setup();

        let outcome = reminders
            .reconcile(["xx:99", "09:45", "25:00", ""], "check")
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Scheduled(vec!["h0".to_string()]));
        assert_eq!(scheduler.daily(), vec![("h0".to_string(), 9, 45)]);
    }

    #[tokio::test]
    async fn test_refused_time_not_persisted() {
        let (reminders, scheduler, db) = setup();
        *scheduler.refuse_hour.lock().unwrap() = Some(8);

        reminders.reconcile(["08:00", "21:00"], "check").await.unwrap();

        let stored = db.lock().await.reminder_schedule_ids().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(scheduler.daily()[0].1, 21);
    }

    #[tokio::test]
    async fn test_repeated_reconcile_never_accumulates() {
        let (reminders, scheduler, db) = setup();

        for _ in 0..3 {
            reminders.reconcile(["08:00", "20:30"], "check").await.unwrap();
        }

        assert_eq!(db.lock().await.reminder_schedule_ids().unwrap().len(), 2);
        assert_eq!(scheduler.daily().len(), 6);
        assert_eq!(scheduler.cancelled().len(), 4);
    }

    #[tokio::test]
    async fn test_permission_denied_is_soft() {
        let (reminders, scheduler, db) = setup();
        db.lock()
            .await
            .set_reminder_schedule_ids(&["keep".to_string()])
            .unwrap();
        scheduler.denied.store(true, Ordering::SeqCst);

        let outcome = reminders.reconcile(["08:00"], "check").await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::PermissionUnavailable);
        assert!(scheduler.cancelled().is_empty());
        assert_eq!(db.lock().await.reminder_schedule_ids().unwrap(), vec!["keep"]);

        assert_eq!(
            reminders.fire_once("now").await.unwrap(),
            FireOutcome::PermissionUnavailable
        );
    }

    #[tokio::test]
    async fn test_fire_once_leaves_daily_handles_alone() {
        let (reminders, scheduler, db) = setup();
        reminders.reconcile(["08:00"], "check").await.unwrap();
        let before = db.lock().await.reminder_schedule_ids().unwrap();

        let outcome = reminders.fire_once("Milk 0/2").await.unwrap();

        assert!(matches!(outcome, FireOutcome::Sent(_)));
        assert_eq!(*scheduler.once.lock().unwrap(), vec!["Milk 0/2"]);
        assert!(scheduler.cancelled().is_empty());
        assert_eq!(db.lock().await.reminder_schedule_ids().unwrap(), before);
    }

    #[tokio::test]
    async fn test_fire_once_scheduler_failure_propagates() {
        let db: SharedDatabase = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        struct Broken;

        #[async_trait]
        impl NotificationScheduler for Broken {
            async fn ensure_permission(&self) -> bool {
                true
            }
            async fn schedule_daily(
                &self,
                _: u32,
                _: u32,
                _: &str,
                _: &str,
            ) -> std::result::Result<String, SchedulerError> {
                Err(SchedulerError("down".into()))
            }
            async fn schedule_once(
                &self,
                _: &str,
                _: &str,
            ) -> std::result::Result<String, SchedulerError> {
                Err(SchedulerError("down".into()))
            }
            async fn cancel(&self, _: &str) {}
        }

        let reminders = Reminders::new(db, Arc::new(Broken), "t");
        assert!(matches!(
            reminders.fire_once("x").await,
            Err(ClientError::Scheduler(_))
        ));
    }

    #[tokio::test]
    async fn test_edit_reminder_times() {
        let (reminders, scheduler, _db) = setup();
        assert_eq!(reminders.reminder_times().await.unwrap(), vec!["20:30"]);

        let (stored, _) = reminders
            .add_reminder_time("07:00".parse().unwrap(), "check")
            .await
            .unwrap();
        assert_eq!(stored, vec!["07:00", "20:30"]);

        let (stored, _) = reminders
            .add_reminder_time("07:00".parse().unwrap(), "check")
            .await
            .unwrap();
        assert_eq!(stored, vec!["07:00", "20:30"]);

        let (stored, outcome) = reminders
            .remove_reminder_time(ReminderTime::new(20, 30).unwrap(), "check")
            .await
            .unwrap();
        assert_eq!(stored, vec!["07:00"]);
        let ReconcileOutcome::Scheduled(handles) = outcome else {
            panic!("expected Scheduled");
        };
        assert_eq!(handles.len(), 1);
        assert_eq!(scheduler.daily().last().map(|d| d.1), Some(7));
    }

    #[tokio::test]
    async fn test_spellings_of_one_time_collapse_and_remove_together() {
        let (reminders, scheduler, db) = setup();

        let (stored, _) = reminders
            .set_reminder_times(["8:00", "08:00", "9:15", "20:30", "xx:99"], "check")
            .await
            .unwrap();
        assert_eq!(stored, vec!["08:00", "09:15", "20:30"]);

        let (stored, outcome) = reminders
            .remove_reminder_time(ReminderTime::new(8, 0).unwrap(), "check")
            .await
            .unwrap();
        assert_eq!(stored, vec!["09:15", "20:30"]);
        assert_eq!(db.lock().await.reminder_times().unwrap(), stored);

        let ReconcileOutcome::Scheduled(handles) = outcome else {
            panic!("expected Scheduled");
        };
        let live: Vec<(u32, u32)> = scheduler
            .daily()
            .iter()
            .filter(|(h, _, _)| handles.contains(h))
            .map(|(_, hour, minute)| (*hour, *minute))
            .collect();
        assert_eq!(live, vec![(9, 15), (20, 30)]);
    }

    #[tokio::test]
    async fn test_remove_normalizes_legacy_spelling() {
        let (reminders, _scheduler, db) = setup();
        db.lock()
            .await
            .set_setting(
                pantry_shared::constants::REMINDER_TIMES_KEY,
                r#"["8:00","20:30","bogus"]"#,
            )
            .unwrap();

        let (stored, _) = reminders
            .remove_reminder_time(ReminderTime::new(8, 0).unwrap(), "check")
            .await
            .unwrap();
        assert_eq!(stored, vec!["20:30"]);
    }
}
