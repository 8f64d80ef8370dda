//! Store trait definition for dependency injection.

use std::future::Future;
use thiserror::Error;

/// Store-related errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key does not follow the `{film_id}_{version}` shape.
    #[error("invalid cache key {0:?}: expected film id and poster version joined by '_'")]
    InvalidKey(String),

    /// The backing store could not be reached or failed the operation.
    #[error("cache store transport error: {0}")]
    Transport(String),
}

/// Validates the `{film_id}_{version}` key shape.
///
/// The version token half is what invalidates stale entries when a poster
/// image is replaced, so a key without it must never be stored.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.contains('_') {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Keyed string store for encoded color values.
///
/// Enables different backends (in-memory, external, no-op) to be used
/// interchangeably. Values are opaque here; the wire format belongs to
/// [`crate::cache::ValueCodec`].
pub trait ColorStore: Send + Sync {
    /// Fetches one stored value. Returns `None` on a miss.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Stores one value under a key.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetches many values in one round trip, preserving key order.
    ///
    /// The result has one element per input key; misses are `None`.
    fn get_batch(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<Vec<Option<String>>, StoreError>> + Send;

    /// Stores many key/value pairs in one round trip.
    fn set_batch(
        &self,
        entries: &[(String, String)],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Store implementation that never caches.
///
/// Always reports misses and accepts writes without storing them. Useful for
/// exercising the full fetch-and-extract path, or when no store is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStore;

impl NoOpStore {
    pub fn new() -> Self {
        NoOpStore
    }
}

impl ColorStore for NoOpStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        validate_key(key)
    }

    async fn get_batch(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        for key in keys {
            validate_key(key)?;
        }
        Ok(vec![None; keys.len()])
    }

    async fn set_batch(&self, entries: &[(String, String)]) -> Result<(), StoreError> {
        for (key, _) in entries {
            validate_key(key)?;
        }
        Ok(())
    }
}
