//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the core starts with zero configuration.

use std::path::PathBuf;

use pantry_shared::constants::{DEFAULT_NOTIFICATION_TITLE, DEFAULT_REMINDER_BODY};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit SQLite file.
    /// Env: `PANTRY_DB_PATH`
    /// Default: `None` (platform data directory).
    pub db_path: Option<PathBuf>,

    /// Title of every reminder notification.
    /// Env: `PANTRY_NOTIFICATION_TITLE`
    pub notification_title: String,

    /// Body of the recurring daily reminder.
    /// Env: `PANTRY_REMINDER_BODY`
    pub reminder_body: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            reminder_body: DEFAULT_REMINDER_BODY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("PANTRY_DB_PATH") {
            if path.trim().is_empty() {
                tracing::warn!("Empty PANTRY_DB_PATH, using platform data directory");
            } else {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(title) = non_blank(&lookup, "PANTRY_NOTIFICATION_TITLE") {
            config.notification_title = title;
        }

        if let Some(body) = non_blank(&lookup, "PANTRY_REMINDER_BODY") {
            config.reminder_body = body;
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    let value = lookup(key)?;
    if value.trim().is_empty() {
        tracing::warn!(key, "Blank value, using default");
        return None;
    }
    Some(value)
}
