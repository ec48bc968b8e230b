//! Short random IDs for birthday records.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of hex characters kept from the generated UUID.
pub const ID_LENGTH: usize = 8;

/// An opaque, short identifier for a birthday record.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BirthdayId(String);

impl BirthdayId {
    /// Create a new BirthdayId from an existing string.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh ID from a random v4 UUID.
    /// Takes the first 8 hex characters of the simple (dash-less) form.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..ID_LENGTH].to_string())
    }

    /// Generate an ID that does not collide with any of `existing`.
    pub fn generate_unique<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a BirthdayId> + Clone,
    {
        loop {
            let candidate = Self::generate();
            if !existing.clone().into_iter().any(|id| *id == candidate) {
                return candidate;
            }
        }
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BirthdayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for BirthdayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BirthdayId({})", self.0)
    }
}

impl From<String> for BirthdayId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BirthdayId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for BirthdayId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
