/// Application name
pub const APP_NAME: &str = "Pantry";

/// Settings key holding the JSON array of daily reminder times (`"HH:MM"`)
pub const REMINDER_TIMES_KEY: &str = "dailyReminderTimes";

/// Settings key holding the JSON array of live schedule handles
pub const REMINDER_SCHEDULE_IDS_KEY: &str = "dailyReminderId";

/// Reminder time used when none has been configured yet
pub const DEFAULT_REMINDER_TIME: &str = "20:30";

/// Title shown on every reminder notification
pub const DEFAULT_NOTIFICATION_TITLE: &str = "Running low";

/// Body of the recurring daily reminder
pub const DEFAULT_REMINDER_BODY: &str = "Check your running-low list";

/// Body of an on-demand notification when nothing is low
pub const NOTHING_LOW_MESSAGE: &str = "Nothing needs restocking right now";

/// Maximum number of items spelled out in a low-stock notification
pub const LOW_STOCK_MESSAGE_LIMIT: usize = 5;

/// Maximum number of name suggestions offered while typing
pub const MAX_NAME_SUGGESTIONS: usize = 6;

/// Window for the "recently added" view, in days
pub const RECENT_ITEMS_DAYS: i64 = 7;

/// SQLite database file name inside the platform data directory
pub const DB_FILE_NAME: &str = "pantry.db";
