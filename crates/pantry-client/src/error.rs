use pantry_store::StoreError;
use thiserror::Error;

/// Failure reported by a [`NotificationScheduler`](crate::scheduler::NotificationScheduler).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Scheduling failed: {0}")]
pub struct SchedulerError(pub String);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
