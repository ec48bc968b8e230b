//! Observer registration for birthday events.
//!
//! The service raises a [`BirthdayEvent`] after every successful mutation and
//! for every reminder found by the daily check. Anything that wants to react
//! (logging, webhooks, sensor refresh) implements [`BirthdayObserver`] and is
//! registered with [`ObserverRegistry::subscribe`].

mod webhook;

pub use webhook::*;

use std::sync::Arc;

use tracing::info;

use crate::models::{BirthdayRecord, ReminderNotification};

/// Event delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthdayEvent {
    /// A reminder is due for one record.
    Reminder(ReminderNotification),

    /// The collection changed; carries a copy of the new collection.
    Updated(Vec<BirthdayRecord>),
}

/// Receiver of birthday events.
///
/// Called synchronously from the service; implementations that do I/O should
/// hand the work off rather than block.
pub trait BirthdayObserver: Send + Sync {
    fn on_event(&self, event: &BirthdayEvent);
}

/// Handle returned by [`ObserverRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of registered observers.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Arc<dyn BirthdayObserver>)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn BirthdayObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver an event to every observer in subscription order.
    pub fn notify(&self, event: &BirthdayEvent) {
        for (_, observer) in &self.observers {
            observer.on_event(event);
        }
    }
}

/// Writes reminders and updates to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl BirthdayObserver for LogObserver {
    fn on_event(&self, event: &BirthdayEvent) {
        match event {
            BirthdayEvent::Reminder(reminder) => {
                info!(
                    id = %reminder.id,
                    days_until = reminder.days_until,
                    "Birthday reminder for {} on {} ({} days until birthday)",
                    reminder.name,
                    reminder.date,
                    reminder.days_until
                );
            }
            BirthdayEvent::Updated(records) => {
                info!("Birthdays updated ({} records)", records.len());
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Collects every event it receives.
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<BirthdayEvent>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<BirthdayEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn reminders(&self) -> Vec<ReminderNotification> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    BirthdayEvent::Reminder(r) => Some(r),
                    BirthdayEvent::Updated(_) => None,
                })
                .collect()
        }

        pub fn update_count(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, BirthdayEvent::Updated(_)))
                .count()
        }
    }

    impl BirthdayObserver for RecordingObserver {
        fn on_event(&self, event: &BirthdayEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
