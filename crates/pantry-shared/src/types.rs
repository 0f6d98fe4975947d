use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReminderTimeError;

/// A wall-clock time of day at which the daily reminder fires.
///
/// Ordering is chronological, so a `BTreeSet<ReminderTime>` is both
/// deduplicated and sorted the way reminder lists are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime {
    hour: u32,
    minute: u32,
}

impl ReminderTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ReminderTimeError> {
        if hour > 23 {
            return Err(ReminderTimeError::Hour(hour));
        }
        if minute > 59 {
            return Err(ReminderTimeError::Minute(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl FromStr for ReminderTime {
    type Err = ReminderTimeError;

    /// Accepts `H:MM` as well as `HH:MM`; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ReminderTimeError::Format(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(format_err)?;
        let parse_part = |part: &str| -> Result<u32, ReminderTimeError> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format_err());
            }
            part.parse().map_err(|_| format_err())
        };

        Self::new(parse_part(hour)?, parse_part(minute)?)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = ReminderTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(value: ReminderTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_parse_and_display() {
        let t: ReminderTime = "08:05".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 5));
        assert_eq!(t.to_string(), "08:05");

        let short: ReminderTime = " 8:05 ".parse().unwrap();
        assert_eq!(short, t);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            "xx:99".parse::<ReminderTime>(),
            Err(ReminderTimeError::Format(_))
        ));
        assert_eq!("24:00".parse::<ReminderTime>(), Err(ReminderTimeError::Hour(24)));
        assert_eq!("12:60".parse::<ReminderTime>(), Err(ReminderTimeError::Minute(60)));
        assert!("1230".parse::<ReminderTime>().is_err());
        assert!("12:".parse::<ReminderTime>().is_err());
        assert!("-1:30".parse::<ReminderTime>().is_err());
    }

    #[test]
    fn test_set_collapses_duplicates_in_order() {
        let set: BTreeSet<ReminderTime> = ["20:30", "08:00", "8:00"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let rendered: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["08:00", "20:30"]);
    }

    #[test]
    fn test_serde_as_string() {
        let t = ReminderTime::new(7, 0).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:00\"");
        let back: ReminderTime = serde_json::from_str("\"7:00\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ReminderTime>("\"nope\"").is_err());
    }
}
