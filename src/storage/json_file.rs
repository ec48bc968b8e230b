//! Versioned JSON document storage.
//!
//! Layout on disk:
//!
//! ```json
//! { "version": 1, "key": "birthday_tracker.birthdays",
//!   "data": { "birthdays": [ ... ] } }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{Persistence, StorageConfig, StorageError};
use crate::models::BirthdayRecord;

/// Key naming the stored document.
pub const STORAGE_KEY: &str = "birthday_tracker.birthdays";

/// Current document version.
pub const STORAGE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    version: u32,
    #[serde(default)]
    key: String,
    #[serde(default)]
    data: Option<StoredData>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredData {
    #[serde(default)]
    birthdays: Option<Vec<BirthdayRecord>>,
}

/// Stores the collection as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store located in the configured data directory.
    pub fn for_config(config: &StorageConfig) -> Self {
        Self::new(config.birthdays_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Persistence for JsonFileStore {
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StorageError> {
        if !fs::try_exists(&self.path).await? {
            debug!("No birthday store at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).await?;
        let document: StoredDocument = serde_json::from_str(&contents)?;

        if document.version > STORAGE_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: document.version,
                supported: STORAGE_VERSION,
            });
        }
        if document.key != STORAGE_KEY {
            warn!(
                "Unexpected storage key {:?} in {:?}, loading anyway",
                document.key, self.path
            );
        }

        let stored = document
            .data
            .and_then(|d| d.birthdays)
            .unwrap_or_default();

        // IDs must stay unique; the first record with an ID wins
        let mut birthdays: Vec<BirthdayRecord> = Vec::with_capacity(stored.len());
        for record in stored {
            if birthdays.iter().any(|r| r.id == record.id) {
                warn!(
                    "Dropping duplicate birthday id={} ({}) in {:?}",
                    record.id, record.name, self.path
                );
                continue;
            }
            birthdays.push(record);
        }
        info!("Loaded {} birthdays from {:?}", birthdays.len(), self.path);
        Ok(birthdays)
    }

    async fn save(&self, records: &[BirthdayRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let document = StoredDocument {
            version: STORAGE_VERSION,
            key: STORAGE_KEY.to_string(),
            data: Some(StoredData {
                birthdays: Some(records.to_vec()),
            }),
        };
        let json = serde_json::to_string_pretty(&document)?;

        let temp = self.temp_path();
        fs::write(&temp, json).await?;
        fs::rename(&temp, &self.path).await?;

        debug!("Saved {} birthdays to {:?}", records.len(), self.path);
        Ok(())
    }
}
