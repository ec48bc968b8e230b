//! Wall-clock time of the daily reminder check.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// An `HH:MM` time of day, 00:00 through 23:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationTime {
    hour: u32,
    minute: u32,
}

impl NotificationTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTimeFormat(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Parse `H:MM` / `HH:MM`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimeFormat(input.to_string());
        let (hour, minute) = input.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// The time at second zero.
    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for NotificationTime {
    fn default() -> Self {
        Self {
            hour: 12,
            minute: 0,
        }
    }
}

impl fmt::Display for NotificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for NotificationTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NotificationTime {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<NotificationTime> for String {
    fn from(time: NotificationTime) -> Self {
        time.to_string()
    }
}
