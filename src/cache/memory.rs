//! In-memory store with TTL expiry and LRU eviction.

use crate::cache::store::{validate_key, ColorStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Entry in the memory store.
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    created_at: Instant,
    /// Last access time for LRU eviction
    last_accessed: Instant,
}

impl StoredValue {
    fn new(value: String) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            last_accessed: now,
        }
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// Memory store configuration.
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Entries older than this are treated as misses (default: 30 days).
    pub ttl: Duration,
    /// Maximum entry count before LRU eviction (default: 1000).
    pub max_entries: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 24 * 60 * 60),
            max_entries: 1000,
        }
    }
}

/// In-memory color store.
///
/// Poster colors only change when the poster image itself changes, which the
/// version token in the key already captures, so a long TTL with a bounded
/// entry count is enough.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredValue>>,
    config: MemoryStoreConfig,
}

impl MemoryStore {
    pub fn new(config: MemoryStoreConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Create a store with the default TTL and size limit.
    pub fn with_defaults() -> Self {
        Self::new(MemoryStoreConfig::default())
    }

    /// Current number of live entries.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn get_sync(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap();

        match entries.get_mut(key) {
            Some(stored) if stored.created_at.elapsed() > self.config.ttl => {
                entries.remove(key);
                Ok(None)
            }
            Some(stored) => {
                stored.touch();
                Ok(Some(stored.value.clone()))
            }
            None => Ok(None),
        }
    }

    fn set_sync(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), StoredValue::new(value.to_string()));

        while entries.len() > self.config.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, stored)| stored.last_accessed)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => entries.remove(&key),
                None => break,
            };
        }

        Ok(())
    }
}

impl ColorStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_sync(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_sync(key, value)
    }

    async fn get_batch(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        keys.iter().map(|key| self.get_sync(key)).collect()
    }

    async fn set_batch(&self, entries: &[(String, String)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set_sync(key, value)?;
        }
        Ok(())
    }
}
