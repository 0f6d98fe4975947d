//! Generic key/value settings plus the reminder bookkeeping kept in them.

use std::collections::BTreeSet;

use pantry_shared::constants::{
    DEFAULT_REMINDER_TIME, REMINDER_SCHEDULE_IDS_KEY, REMINDER_TIMES_KEY,
};
use pantry_shared::ReminderTime;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    // ------------------------------------------------------------------
    // Raw key/value access
    // ------------------------------------------------------------------

    /// Fetch a setting, `None` if the key was never written.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1 LIMIT 1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a setting.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reminder configuration
    // ------------------------------------------------------------------

    /// Desired daily reminder times as stored.
    ///
    /// Falls back to the single default time when the setting is missing or
    /// is not a JSON array of strings. Entries are not validated here; the
    /// reconciler skips malformed ones.
    pub fn reminder_times(&self) -> Result<Vec<String>> {
        Ok(self
            .json_list(REMINDER_TIMES_KEY)?
            .unwrap_or_else(|| vec![DEFAULT_REMINDER_TIME.to_string()]))
    }

    /// Replace the desired reminder times. Times are stored as `HH:MM`,
    /// deduplicated and in chronological order.
    pub fn set_reminder_times<I>(&self, times: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = ReminderTime>,
    {
        let unique: BTreeSet<ReminderTime> = times.into_iter().collect();
        let times: Vec<String> = unique.iter().map(ToString::to_string).collect();
        self.set_setting(REMINDER_TIMES_KEY, &serde_json::to_string(&times)?)?;
        Ok(times)
    }

    /// Handles of the currently scheduled daily reminders (empty if unset or
    /// unreadable).
    pub fn reminder_schedule_ids(&self) -> Result<Vec<String>> {
        Ok(self.json_list(REMINDER_SCHEDULE_IDS_KEY)?.unwrap_or_default())
    }

    /// Overwrite the stored schedule handles with `ids`.
    pub fn set_reminder_schedule_ids(&self, ids: &[String]) -> Result<()> {
        self.set_setting(REMINDER_SCHEDULE_IDS_KEY, &serde_json::to_string(ids)?)
    }

    fn json_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(raw) = self.get_setting(key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => Ok(Some(list)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable setting");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_round_trip_and_overwrite() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("theme").unwrap(), None);

        db.set_setting("theme", "dark").unwrap();
        db.set_setting("theme", "light").unwrap();
        assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn reminder_times_default_when_absent_or_corrupt() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.reminder_times().unwrap(), vec!["20:30"]);

        db.set_setting(REMINDER_TIMES_KEY, "{not json").unwrap();
        assert_eq!(db.reminder_times().unwrap(), vec!["20:30"]);

        db.set_setting(REMINDER_TIMES_KEY, "{\"a\":1}").unwrap();
        assert_eq!(db.reminder_times().unwrap(), vec!["20:30"]);
    }

    fn at(hour: u32, minute: u32) -> ReminderTime {
        ReminderTime::new(hour, minute).unwrap()
    }

    #[test]
    fn reminder_times_are_deduplicated_and_sorted() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .set_reminder_times([at(20, 30), at(8, 0), at(20, 30)])
            .unwrap();
        assert_eq!(stored, vec!["08:00", "20:30"]);
        assert_eq!(db.reminder_times().unwrap(), vec!["08:00", "20:30"]);

        db.set_reminder_times(Vec::new()).unwrap();
        assert!(db.reminder_times().unwrap().is_empty());
    }

    #[test]
    fn reminder_times_sort_chronologically() {
        let db = Database::open_in_memory().unwrap();
        let stored = db.set_reminder_times([at(20, 30), at(9, 15)]).unwrap();
        assert_eq!(stored, vec!["09:15", "20:30"]);
    }

    #[test]
    fn schedule_ids_default_to_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.reminder_schedule_ids().unwrap().is_empty());

        let ids = vec!["a".to_string(), "b".to_string()];
        db.set_reminder_schedule_ids(&ids).unwrap();
        assert_eq!(db.reminder_schedule_ids().unwrap(), ids);

        db.set_setting(REMINDER_SCHEDULE_IDS_KEY, "garbage").unwrap();
        assert!(db.reminder_schedule_ids().unwrap().is_empty());
    }
}
