use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderTimeError {
    #[error("Expected HH:MM, got {0:?}")]
    Format(String),

    #[error("Hour out of range: {0}")]
    Hour(u32),

    #[error("Minute out of range: {0}")]
    Minute(u32),
}
