//! In-memory persistence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Persistence, StorageError};
use crate::models::BirthdayRecord;

/// Keeps the last saved collection in memory and counts saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<BirthdayRecord>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing collection.
    pub fn with_records(records: Vec<BirthdayRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            saves: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the last saved collection.
    pub fn snapshot(&self) -> Vec<BirthdayRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StorageError> {
        Ok(self.snapshot())
    }

    async fn save(&self, records: &[BirthdayRecord]) -> Result<(), StorageError> {
        *self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
