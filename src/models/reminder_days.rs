//! Reminder sets: the days-before-occurrence offsets that trigger a reminder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Reminder set used when neither the record nor the configuration names one.
pub const DEFAULT_REMINDER_DAYS: [u32; 3] = [7, 1, 0];

/// An ordered set of non-negative day offsets, sorted descending without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct ReminderDays(Vec<u32>);

impl ReminderDays {
    /// Build a set from arbitrary offsets, sorting and deduplicating them.
    pub fn new(mut days: Vec<u32>) -> Self {
        days.sort_unstable_by(|a, b| b.cmp(a));
        days.dedup();
        Self(days)
    }

    /// Parse a comma-separated list such as `"7,1,0"`.
    ///
    /// Empty segments are skipped. The result must contain at least one value
    /// and every value must be a non-negative integer.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidReminderDays(input.to_string());
        let mut days = Vec::new();

        for segment in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let value: i64 = segment.parse().map_err(|_| invalid())?;
            let value = u32::try_from(value).map_err(|_| invalid())?;
            days.push(value);
        }

        if days.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(days))
    }

    pub fn contains(&self, days: u32) -> bool {
        self.0.contains(&days)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Default for ReminderDays {
    fn default() -> Self {
        Self::new(DEFAULT_REMINDER_DAYS.to_vec())
    }
}

impl fmt::Display for ReminderDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}

impl FromStr for ReminderDays {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<u32>> for ReminderDays {
    fn from(days: Vec<u32>) -> Self {
        Self::new(days)
    }
}

impl From<ReminderDays> for Vec<u32> {
    fn from(days: ReminderDays) -> Self {
        days.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_descending() {
        let days = ReminderDays::parse("0,7,1").unwrap();
        assert_eq!(days.as_slice(), &[7, 1, 0]);
    }

    #[test]
    fn test_parse_trims_and_skips_empty_segments() {
        let days = ReminderDays::parse(" 3 , ,14,").unwrap();
        assert_eq!(days.as_slice(), &[14, 3]);
    }

    #[test]
    fn test_parse_dedups() {
        let days = ReminderDays::parse("1,1,2").unwrap();
        assert_eq!(days.as_slice(), &[2, 1]);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            ReminderDays::parse(""),
            Err(ValidationError::InvalidReminderDays(_))
        ));
        assert!(ReminderDays::parse(" , ").is_err());
    }

    #[test]
    fn test_parse_rejects_negative_and_garbage() {
        assert!(ReminderDays::parse("7,-1").is_err());
        assert!(ReminderDays::parse("seven").is_err());
    }

    #[test]
    fn test_default_set() {
        assert_eq!(ReminderDays::default().as_slice(), &[7, 1, 0]);
        assert_eq!(ReminderDays::default().to_string(), "7,1,0");
    }

    #[test]
    fn test_deserialize_normalizes_order() {
        let days: ReminderDays = serde_json::from_str("[0, 3, 3, 10]").unwrap();
        assert_eq!(days.as_slice(), &[10, 3, 0]);
        assert_eq!(serde_json::to_string(&days).unwrap(), "[10,3,0]");
    }
}
