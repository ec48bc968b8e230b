//! Birthday records and the derived views built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BirthdayDate, BirthdayId, ReminderDays};
use crate::calculate::{age_turning, days_until, ordinal_for_age};

/// A single tracked birthday, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    /// Unique short identifier
    pub id: BirthdayId,

    /// Person's name
    pub name: String,

    /// Canonical date, `0000` year when unknown
    pub date: BirthdayDate,

    /// Offsets (days before the birthday) that trigger a reminder.
    /// Empty means "use the configured default set".
    #[serde(default = "empty_reminder_days")]
    pub reminder_days_before: ReminderDays,

    #[serde(default)]
    pub notes: String,
}

fn empty_reminder_days() -> ReminderDays {
    ReminderDays::new(Vec::new())
}

impl BirthdayRecord {
    /// Create a record with a freshly generated ID.
    pub fn new(name: String, date: BirthdayDate, reminder_days_before: ReminderDays) -> Self {
        Self {
            id: BirthdayId::generate(),
            name,
            date,
            reminder_days_before,
            notes: String::new(),
        }
    }

    /// Builder method to set the ID.
    pub fn with_id(mut self, id: BirthdayId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set notes.
    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }

    /// The record's reminder set, or `defaults` when it has none.
    pub fn effective_reminder_days<'a>(&'a self, defaults: &'a ReminderDays) -> &'a ReminderDays {
        if self.reminder_days_before.is_empty() {
            defaults
        } else {
            &self.reminder_days_before
        }
    }
}

/// A record with its derived facts for a given reference day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedBirthday {
    pub id: BirthdayId,
    pub name: String,
    /// Display form (`DD-MM` or `DD-MM-YYYY`)
    pub date: String,
    pub days_until: u32,
    pub age_turning: Option<i32>,
    pub age_turning_ordinal: Option<String>,
    pub reminder_days_before: ReminderDays,
    pub notes: String,
}

impl EnrichedBirthday {
    pub fn from_record(record: &BirthdayRecord, today: NaiveDate) -> Self {
        let age = age_turning(&record.date, today);
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            date: record.date.to_display(),
            days_until: days_until(&record.date, today),
            age_turning: age,
            age_turning_ordinal: age.and_then(ordinal_for_age),
            reminder_days_before: record.reminder_days_before.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Payload of a reminder raised by the daily check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderNotification {
    pub name: String,
    /// Display form (`DD-MM` or `DD-MM-YYYY`)
    pub date: String,
    pub days_until: u32,
    pub age_turning: Option<i32>,
    pub age_turning_ordinal: Option<String>,
    pub notes: String,
    pub id: BirthdayId,
}

impl ReminderNotification {
    pub fn from_record(record: &BirthdayRecord, days_until: u32, today: NaiveDate) -> Self {
        let age = age_turning(&record.date, today);
        Self {
            name: record.name.clone(),
            date: record.date.to_display(),
            days_until,
            age_turning: age,
            age_turning_ordinal: age.and_then(ordinal_for_age),
            notes: record.notes.clone(),
            id: record.id.clone(),
        }
    }
}
