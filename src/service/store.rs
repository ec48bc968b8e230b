//! Ordered in-memory collection backed by a [`Persistence`] implementation.

use std::sync::Arc;

use crate::models::{BirthdayId, BirthdayRecord};
use crate::storage::{Persistence, StorageError};

/// The single source of truth for birthday records.
///
/// Readers get clones; the live records never leave the store.
pub struct BirthdayStore {
    records: Vec<BirthdayRecord>,
    persistence: Arc<dyn Persistence>,
}

impl BirthdayStore {
    /// Load the collection from `persistence`.
    pub async fn load(persistence: Arc<dyn Persistence>) -> Result<Self, StorageError> {
        let records = persistence.load().await?;
        Ok(Self {
            records,
            persistence,
        })
    }

    /// Persist the full collection.
    pub async fn save(&self) -> Result<(), StorageError> {
        self.persistence.save(&self.records).await
    }

    /// Copies of all records in insertion order.
    pub fn all(&self) -> Vec<BirthdayRecord> {
        self.records.clone()
    }

    pub fn records(&self) -> &[BirthdayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<BirthdayRecord> {
        self.records.iter().find(|r| r.id == *id).cloned()
    }

    /// An ID not used by any current record.
    pub fn fresh_id(&self) -> BirthdayId {
        BirthdayId::generate_unique(self.records.iter().map(|r| &r.id))
    }

    pub(crate) fn push(&mut self, record: BirthdayRecord) {
        self.records.push(record);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<BirthdayRecord> {
        let index = self.records.iter().position(|r| r.id == *id)?;
        Some(self.records.remove(index))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut BirthdayRecord> {
        self.records.iter_mut().find(|r| r.id == *id)
    }
}
