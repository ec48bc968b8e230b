//! Birthday service: CRUD, derived views and the reminder check.
//!
//! The service is constructed explicitly and handed to whoever needs it (the
//! CLI, the HTTP API, the scheduler). Every successful mutation is persisted
//! and then announced to observers as [`BirthdayEvent::Updated`].

mod store;

pub use store::*;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{
    BirthdayDate, BirthdayRecord, EnrichedBirthday, ReminderDays, ReminderNotification,
    ValidationError,
};
use crate::notify::{BirthdayEvent, BirthdayObserver, ObserverRegistry, SubscriptionId};
use crate::scheduler::check_reminders;
use crate::storage::{Persistence, StorageError};

/// Service shared between the API handlers and the scheduler.
pub type SharedService = Arc<RwLock<BirthdayService>>;

/// Errors returned by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Birthday with id '{0}' not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Input for [`BirthdayService::add`], as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBirthday {
    pub name: String,
    /// `D-M` or `D-M-Y`
    pub date: String,
    /// Comma-separated offsets; the default set applies when absent
    #[serde(default)]
    pub reminder_days_before: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for [`BirthdayService::edit`]. Only present fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirthdayEdit {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub reminder_days_before: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated form of a [`BirthdayEdit`].
struct ParsedEdit {
    name: Option<String>,
    date: Option<BirthdayDate>,
    reminder_days_before: Option<ReminderDays>,
    notes: Option<String>,
}

impl BirthdayEdit {
    fn parse(self) -> Result<ParsedEdit, ValidationError> {
        Ok(ParsedEdit {
            name: self.name,
            date: self
                .date
                .as_deref()
                .map(BirthdayDate::parse_input)
                .transpose()?,
            reminder_days_before: self
                .reminder_days_before
                .as_deref()
                .map(ReminderDays::parse)
                .transpose()?,
            notes: self.notes,
        })
    }
}

pub struct BirthdayService {
    store: BirthdayStore,
    default_reminder_days: ReminderDays,
    observers: ObserverRegistry,
}

impl BirthdayService {
    /// Load the collection and build the service.
    pub async fn load(
        persistence: Arc<dyn Persistence>,
        default_reminder_days: ReminderDays,
    ) -> Result<Self, ServiceError> {
        let store = BirthdayStore::load(persistence).await?;
        Ok(Self {
            store,
            default_reminder_days,
            observers: ObserverRegistry::new(),
        })
    }

    /// Wrap into the shared form used by the API and scheduler.
    pub fn into_shared(self) -> SharedService {
        Arc::new(RwLock::new(self))
    }

    pub fn subscribe(&mut self, observer: Arc<dyn BirthdayObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn default_reminder_days(&self) -> &ReminderDays {
        &self.default_reminder_days
    }

    pub fn set_default_reminder_days(&mut self, days: ReminderDays) {
        info!("Default reminder days set to {}", days);
        self.default_reminder_days = days;
    }

    /// Add a birthday with a freshly generated ID.
    pub async fn add(&mut self, input: NewBirthday) -> Result<BirthdayRecord, ServiceError> {
        let date = BirthdayDate::parse_input(&input.date)?;
        let reminder_days = match input.reminder_days_before.as_deref() {
            Some(days) if !days.trim().is_empty() => ReminderDays::parse(days)?,
            _ => self.default_reminder_days.clone(),
        };

        let record = BirthdayRecord::new(input.name, date, reminder_days)
            .with_id(self.store.fresh_id())
            .with_notes(input.notes.unwrap_or_default());

        self.store.push(record.clone());
        self.store.save().await?;

        info!(
            "Added birthday for {} on {} (id={})",
            record.name, record.date, record.id
        );
        self.notify_updated();
        Ok(record)
    }

    /// Remove a birthday. Returns false when the ID is unknown.
    pub async fn remove(&mut self, id: &str) -> Result<bool, ServiceError> {
        if self.store.remove(id).is_none() {
            return Ok(false);
        }
        self.store.save().await?;

        info!("Removed birthday id={}", id);
        self.notify_updated();
        Ok(true)
    }

    /// Apply a partial update and return the merged record.
    pub async fn edit(
        &mut self,
        id: &str,
        edit: BirthdayEdit,
    ) -> Result<BirthdayRecord, ServiceError> {
        let edit = edit.parse()?;
        let record = self
            .store
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if let Some(name) = edit.name {
            record.name = name;
        }
        if let Some(date) = edit.date {
            record.date = date;
        }
        if let Some(days) = edit.reminder_days_before {
            record.reminder_days_before = days;
        }
        if let Some(notes) = edit.notes {
            record.notes = notes;
        }
        let updated = record.clone();

        self.store.save().await?;

        info!("Edited birthday id={}", id);
        self.notify_updated();
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Option<BirthdayRecord> {
        self.store.get(id)
    }

    /// Copies of all records in insertion order.
    pub fn records(&self) -> Vec<BirthdayRecord> {
        self.store.all()
    }

    /// All records with derived fields, soonest first.
    ///
    /// The sort is stable, so ties keep insertion order.
    pub fn list(&self, today: NaiveDate) -> Vec<EnrichedBirthday> {
        let mut list: Vec<EnrichedBirthday> = self
            .store
            .records()
            .iter()
            .map(|r| EnrichedBirthday::from_record(r, today))
            .collect();
        list.sort_by_key(|b| b.days_until);
        list
    }

    /// Run the reminder check for `today` and notify observers of each match.
    pub fn check_reminders(&self, today: NaiveDate) -> Vec<ReminderNotification> {
        let reminders = check_reminders(self.store.records(), today, &self.default_reminder_days);
        for reminder in &reminders {
            info!(
                "Firing reminder for {} ({} days until birthday)",
                reminder.name, reminder.days_until
            );
            self.observers
                .notify(&BirthdayEvent::Reminder(reminder.clone()));
        }
        reminders
    }

    fn notify_updated(&self) {
        self.observers
            .notify(&BirthdayEvent::Updated(self.store.all()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingObserver;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_birthday(name: &str, date: &str) -> NewBirthday {
        NewBirthday {
            name: name.to_string(),
            date: date.to_string(),
            ..Default::default()
        }
    }

    async fn setup() -> (BirthdayService, Arc<MemoryStore>, Arc<RecordingObserver>) {
        let persistence = Arc::new(MemoryStore::new());
        let mut service = BirthdayService::load(persistence.clone(), ReminderDays::default())
            .await
            .unwrap();
        let observer = Arc::new(RecordingObserver::default());
        service.subscribe(observer.clone());
        (service, persistence, observer)
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let (mut service, persistence, observer) = setup().await;

        let added = service
            .add(NewBirthday {
                name: "Alice".to_string(),
                date: "15-06-1985".to_string(),
                reminder_days_before: Some("3,14".to_string()),
                notes: Some("likes cake".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(added.id.as_str().len(), 8);
        assert_eq!(added.date.to_string(), "1985-06-15");
        assert_eq!(added.reminder_days_before.as_slice(), &[14, 3]);
        assert_eq!(service.get(added.id.as_str()), Some(added.clone()));

        assert_eq!(persistence.snapshot(), vec![added]);
        assert_eq!(persistence.save_count(), 1);
        assert_eq!(observer.update_count(), 1);
    }

    #[tokio::test]
    async fn test_add_generates_unique_ids() {
        let (mut service, _, _) = setup().await;
        let a = service.add(new_birthday("A", "1-1")).await.unwrap();
        let b = service.add(new_birthday("B", "1-1")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_add_applies_default_reminder_days() {
        let (mut service, _, _) = setup().await;
        service.set_default_reminder_days(ReminderDays::new(vec![2, 30]));

        let added = service.add(new_birthday("Bob", "2-2")).await.unwrap();
        assert_eq!(added.reminder_days_before.as_slice(), &[30, 2]);
        assert_eq!(added.notes, "");
    }

    #[tokio::test]
    async fn test_add_invalid_date_does_not_mutate() {
        let (mut service, persistence, observer) = setup().await;

        let err = service.add(new_birthday("Bad", "31-02")).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidDateFormat(_))
        ));
        assert!(service.records().is_empty());
        assert_eq!(persistence.save_count(), 0);
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_add_invalid_reminder_days() {
        let (mut service, _, _) = setup().await;
        let mut input = new_birthday("Bad", "1-1");
        input.reminder_days_before = Some("1,-2".to_string());

        let err = service.add(input).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidReminderDays(_))
        ));
        assert!(service.records().is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let (mut service, persistence, _) = setup().await;
        let added = service.add(new_birthday("Alice", "1-1")).await.unwrap();

        assert!(service.remove(added.id.as_str()).await.unwrap());
        assert!(service.get(added.id.as_str()).is_none());
        assert!(persistence.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_store_untouched() {
        let (mut service, persistence, observer) = setup().await;
        service.add(new_birthday("Alice", "1-1")).await.unwrap();
        let before = service.records();

        assert!(!service.remove("nope").await.unwrap());
        assert_eq!(service.records(), before);
        assert_eq!(persistence.save_count(), 1);
        assert_eq!(observer.update_count(), 1);
    }

    #[tokio::test]
    async fn test_edit_single_field() {
        let (mut service, _, _) = setup().await;
        let added = service
            .add(NewBirthday {
                name: "Alice".to_string(),
                date: "15-06-1985".to_string(),
                reminder_days_before: Some("5".to_string()),
                notes: Some("old".to_string()),
            })
            .await
            .unwrap();

        let edited = service
            .edit(
                added.id.as_str(),
                BirthdayEdit {
                    notes: Some("new".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut expected = added.clone();
        expected.notes = "new".to_string();
        assert_eq!(edited, expected);
        assert_eq!(service.get(added.id.as_str()), Some(expected));
    }

    #[tokio::test]
    async fn test_edit_date_and_reminders() {
        let (mut service, _, _) = setup().await;
        let added = service.add(new_birthday("Alice", "1-1")).await.unwrap();

        let edited = service
            .edit(
                added.id.as_str(),
                BirthdayEdit {
                    date: Some("2-3-2001".to_string()),
                    reminder_days_before: Some("0".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.name, "Alice");
        assert_eq!(edited.date.to_string(), "2001-03-02");
        assert_eq!(edited.reminder_days_before.as_slice(), &[0]);
    }

    #[tokio::test]
    async fn test_edit_missing_is_not_found() {
        let (mut service, persistence, _) = setup().await;

        let err = service
            .edit("missing", BirthdayEdit::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(id) if id == "missing"));
        assert_eq!(persistence.save_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_invalid_date_leaves_record() {
        let (mut service, _, _) = setup().await;
        let added = service.add(new_birthday("Alice", "1-1")).await.unwrap();

        let result = service
            .edit(
                added.id.as_str(),
                BirthdayEdit {
                    name: Some("Changed".to_string()),
                    date: Some("99-99".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(service.get(added.id.as_str()), Some(added));
    }

    #[tokio::test]
    async fn test_list_sorted_with_stable_ties() {
        let (mut service, _, _) = setup().await;
        let today = ymd(2025, 6, 10);
        service.add(new_birthday("Later", "20-06")).await.unwrap();
        service.add(new_birthday("TieA", "12-06")).await.unwrap();
        service.add(new_birthday("Today", "10-06-2000")).await.unwrap();
        service.add(new_birthday("TieB", "12-06")).await.unwrap();

        let list = service.list(today);
        let names: Vec<&str> = list.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Today", "TieA", "TieB", "Later"]);

        assert_eq!(list[0].days_until, 0);
        assert_eq!(list[0].age_turning, Some(25));
        assert_eq!(list[0].date, "10-06-2000");
    }

    #[tokio::test]
    async fn test_loads_existing_records() {
        let existing = BirthdayRecord::new(
            "Stored".to_string(),
            BirthdayDate::parse_input("3-3").unwrap(),
            ReminderDays::default(),
        );
        let persistence = Arc::new(MemoryStore::with_records(vec![existing.clone()]));

        let service = BirthdayService::load(persistence, ReminderDays::default())
            .await
            .unwrap();
        assert_eq!(service.records(), vec![existing]);
    }

    #[tokio::test]
    async fn test_check_reminders_notifies_observers() {
        let (mut service, _, observer) = setup().await;
        let alice = service
            .add(new_birthday("Alice", "17-06-1985"))
            .await
            .unwrap();
        service.add(new_birthday("Bob", "18-06")).await.unwrap();

        let reminders = service.check_reminders(ymd(2025, 6, 10));

        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, alice.id);
        assert_eq!(reminders[0].days_until, 7);
        assert_eq!(observer.reminders(), reminders);
    }

    #[tokio::test]
    async fn test_unsubscribed_observer_gets_nothing() {
        let persistence = Arc::new(MemoryStore::new());
        let mut service = BirthdayService::load(persistence, ReminderDays::default())
            .await
            .unwrap();
        let observer = Arc::new(RecordingObserver::default());
        let id = service.subscribe(observer.clone());
        assert!(service.unsubscribe(id));

        service.add(new_birthday("Alice", "1-1")).await.unwrap();
        assert!(observer.events().is_empty());
    }
}
