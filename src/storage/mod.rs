/// Storage layer for persisting tracker collections
///
/// Each logical collection is one JSON document under a fixed string key.
/// Backends only move strings around; `PersistedStore` owns serialization
/// and the fail-open policy: reads fall back to a default, write failures
/// are logged and swallowed.

pub mod sqlite;
pub mod memory;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;
pub use memory::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Keys of the collections the tracker persists
pub mod keys {
    pub const ACTIVITY_LOG: &str = "activity_log";
    pub const LIFETIME_TOTALS: &str = "lifetime_totals";
    pub const STREAK_STATE: &str = "streak_state";
    pub const UNLOCKED_ACHIEVEMENTS: &str = "unlocked_achievements";

    pub const ALL: [&str; 4] = [ACTIVITY_LOG, LIFETIME_TOTALS, STREAK_STATE, UNLOCKED_ACHIEVEMENTS];
}

/// Version written into every document envelope
pub const DOCUMENT_VERSION: u32 = 1;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, {available} available")]
    QuotaExceeded { key: String, needed: usize, available: usize },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Raw string key-value storage
///
/// This trait lets the tracker run on SQLite on disk or on an in-memory map
/// in tests while keeping the same interface.
pub trait KeyValueBackend {
    /// Read the document stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (insert or replace) the document under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the document under `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All stored keys in ascending order
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// On-disk shape of a persisted document
#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: Value,
}

/// Typed, best-effort persistence on top of a backend
pub struct PersistedStore<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> PersistedStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the value under `key`, or `default` if it is absent or unreadable
    ///
    /// Never fails: backend errors and malformed documents are logged and
    /// replaced by the default.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!("Failed to read '{}', using default: {}", key, e);
                return default;
            }
        };

        match Self::decode(key, &raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding malformed document '{}': {}", key, e);
                default
            }
        }
    }

    /// Serialize and write `value` under `key`
    ///
    /// Failures (quota, I/O, serialization) are logged and swallowed; the
    /// caller's in-memory copy stays authoritative.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let envelope = Envelope { version: DOCUMENT_VERSION, data: value };

        let result = serde_json::to_string(&envelope)
            .map_err(StorageError::from)
            .and_then(|payload| self.backend.write(key, &payload));

        match result {
            Ok(()) => tracing::debug!("Saved '{}'", key),
            Err(e) => tracing::warn!("Failed to save '{}', keeping in-memory state: {}", key, e),
        }
    }

    /// Remove the document under `key`, logging failures
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            tracing::warn!("Failed to remove '{}': {}", key, e);
        }
    }

    /// Decode either a versioned envelope or a bare legacy document
    fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;

        if Self::is_envelope(&value) {
            let envelope: RawEnvelope = serde_json::from_value(value)?;
            if envelope.version > DOCUMENT_VERSION {
                tracing::warn!(
                    "Document '{}' has newer version {} (supported {}), reading best-effort",
                    key, envelope.version, DOCUMENT_VERSION
                );
            }
            return serde_json::from_value(envelope.data);
        }

        serde_json::from_value(value)
    }

    fn is_envelope(value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                map.len() == 2
                    && map.get("version").map_or(false, Value::is_u64)
                    && map.contains_key("data")
            }
            _ => false,
        }
    }
}
