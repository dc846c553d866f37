//! Key-value persistence layer
//!
//! The game persists exactly one durable value (the balance), so the
//! contract is a minimal string key-value store. `RocksStore` backs the
//! server; `MemoryStore` backs tests and `--ephemeral` runs.

use rocksdb::{Options, DB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open store: {0}")]
    Open(String),

    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("stored value for '{key}' is corrupt: {value:?}")]
    Corrupt { key: String, value: String },
}

/// Minimal persistence contract consumed by [`crate::balance::BalanceStore`].
///
/// Writes must be durable before returning.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// RocksDB-backed store
#[derive(Clone)]
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path).map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let raw = self
            .db
            .get(key.as_bytes())
            .map_err(|e| StorageError::Read(e.to_string()))?;
        match raw {
            Some(bytes) => {
                let value = String::from_utf8(bytes).map_err(|e| StorageError::Corrupt {
                    key: key.to_string(),
                    value: format!("invalid utf-8: {}", e),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db
            .put(key.as_bytes(), value.as_bytes())
            .map_err(|e| StorageError::Write(e.to_string()))
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
