//! Per-person sensors: days until each birthday.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::calculate::{age_turning, days_until, ordinal_for_age};
use crate::models::{BirthdayId, BirthdayRecord, ReminderDays};
use crate::notify::{BirthdayEvent, BirthdayObserver};

pub const SENSOR_UNIT: &str = "days";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorAttributes {
    pub birthday_id: BirthdayId,
    pub date: String,
    pub age_turning: Option<i32>,
    pub age_turning_ordinal: Option<String>,
    pub reminder_days_before: ReminderDays,
    pub notes: String,
}

/// Snapshot of a sensor as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub unit_of_measurement: &'static str,
    pub available: bool,
    /// Days until the next birthday; none once the record is gone
    pub value: Option<u32>,
    pub attributes: Option<SensorAttributes>,
}

/// A sensor bound to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdaySensor {
    record: BirthdayRecord,
    removed: bool,
}

impl BirthdaySensor {
    pub fn new(record: BirthdayRecord) -> Self {
        Self {
            record,
            removed: false,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("birthday_tracker_{}", self.record.id)
    }

    pub fn birthday_id(&self) -> &BirthdayId {
        &self.record.id
    }

    pub fn is_available(&self) -> bool {
        !self.removed
    }

    fn set_removed(&mut self) {
        self.removed = true;
    }

    pub fn state(&self, today: NaiveDate) -> SensorState {
        let (value, attributes) = if self.removed {
            (None, None)
        } else {
            let record = &self.record;
            let age = age_turning(&record.date, today);
            let attributes = SensorAttributes {
                birthday_id: record.id.clone(),
                date: record.date.to_display(),
                age_turning: age,
                age_turning_ordinal: age.and_then(ordinal_for_age),
                reminder_days_before: record.reminder_days_before.clone(),
                notes: record.notes.clone(),
            };
            (Some(days_until(&record.date, today)), Some(attributes))
        };

        SensorState {
            unique_id: self.unique_id(),
            name: self.record.name.clone(),
            unit_of_measurement: SENSOR_UNIT,
            available: !self.removed,
            value,
            attributes,
        }
    }
}

/// What a reconcile pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SensorChanges {
    pub added: Vec<BirthdayId>,
    pub updated: Vec<BirthdayId>,
    /// Sensors marked unavailable and dropped
    pub removed: Vec<BirthdaySensor>,
}

#[derive(Debug, Default)]
struct Sensors {
    live: Vec<BirthdaySensor>,
    /// Removed sensors not yet reported as unavailable
    retired: Vec<BirthdaySensor>,
}

/// Tracks one sensor per record and follows store updates.
///
/// A sensor whose record is removed is reported once by [`states`](Self::states)
/// as unavailable and then dropped.
#[derive(Debug, Default)]
pub struct SensorRegistry {
    sensors: Mutex<Sensors>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated from the current records.
    pub fn from_records(records: &[BirthdayRecord]) -> Self {
        let registry = Self::new();
        registry.reconcile(records);
        registry
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Sensors> {
        self.sensors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add sensors for new records, refresh existing ones, and retire sensors
    /// whose record is gone.
    pub fn reconcile(&self, records: &[BirthdayRecord]) -> SensorChanges {
        let mut sensors = self.lock();
        let mut changes = SensorChanges::default();

        let (kept, gone): (Vec<BirthdaySensor>, Vec<BirthdaySensor>) = sensors
            .live
            .drain(..)
            .partition(|s| records.iter().any(|r| r.id == s.record.id));

        for mut sensor in gone {
            sensor.set_removed();
            info!("Sensor {} is unavailable, record removed", sensor.unique_id());
            changes.removed.push(sensor);
        }

        let mut next = Vec::with_capacity(records.len());
        for record in records {
            if kept.iter().any(|s| s.record.id == record.id) {
                changes.updated.push(record.id.clone());
            } else {
                changes.added.push(record.id.clone());
            }
            next.push(BirthdaySensor::new(record.clone()));
        }
        sensors.live = next;
        sensors.retired.extend(changes.removed.iter().cloned());

        debug!(
            "Sensors reconciled: {} added, {} updated, {} removed",
            changes.added.len(),
            changes.updated.len(),
            changes.removed.len()
        );
        changes
    }

    /// Number of live sensors.
    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// States of all live sensors in record order, followed by any retired
    /// sensors not reported yet. Retired sensors are dropped once reported.
    pub fn states(&self, today: NaiveDate) -> Vec<SensorState> {
        let mut sensors = self.lock();
        let retired = std::mem::take(&mut sensors.retired);
        sensors
            .live
            .iter()
            .chain(retired.iter())
            .map(|s| s.state(today))
            .collect()
    }
}

impl BirthdayObserver for SensorRegistry {
    fn on_event(&self, event: &BirthdayEvent) {
        if let BirthdayEvent::Updated(records) = event {
            self.reconcile(records);
        }
    }
}
