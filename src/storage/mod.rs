//! Persistence for the birthday collection.
//!
//! The whole collection is stored as one versioned JSON document. The
//! [`Persistence`] trait is the seam between the service and the backing
//! store:
//! - [`JsonFileStore`] writes the document to the data directory
//! - [`MemoryStore`] keeps it in memory (tests, dry runs)

mod json_file;
mod memory;

pub use json_file::*;
pub use memory::*;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::BirthdayRecord;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported storage version {found} (max supported {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Load/save hooks for the full ordered collection.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Load all records; an absent store yields an empty list.
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StorageError>;

    /// Replace the stored collection.
    async fn save(&self, records: &[BirthdayRecord]) -> Result<(), StorageError>;
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of the birthdays document.
    pub fn birthdays_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", STORAGE_KEY))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
