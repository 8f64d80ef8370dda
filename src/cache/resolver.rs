//! Cache-aside partitioning and asynchronous write-back.

use crate::cache::codec::ValueCodec;
use crate::cache::store::{ColorStore, StoreError};
use crate::color::Color;
use crate::model::Entry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A batch of entries split by cache outcome.
///
/// `hits` already carry their colors and sort values; `misses` still need the
/// full fetch-and-extract path.
#[derive(Debug, Default)]
pub struct ResolvedBatch {
    pub hits: Vec<Entry>,
    pub misses: Vec<Entry>,
}

/// A pending store write for one freshly extracted poster.
#[derive(Debug, Clone)]
pub struct CacheWrite {
    pub key: String,
    pub colors: Vec<Color>,
}

/// Looks up every entry's cache key in one batch and splits the entries by
/// outcome.
///
/// A stored value the codec rejects counts as a miss: the entry re-runs the
/// extract path and the write-back replaces the bad value.
pub async fn partition_by_cache<S, C>(
    store: &S,
    codec: &C,
    entries: Vec<Entry>,
) -> Result<ResolvedBatch, StoreError>
where
    S: ColorStore,
    C: ValueCodec,
{
    let keys: Vec<String> = entries.iter().map(|e| e.cache_key.clone()).collect();
    let values = store.get_batch(&keys).await?;

    let mut batch = ResolvedBatch::default();
    for (mut entry, value) in entries.into_iter().zip(values) {
        match value {
            Some(raw) => match codec.decode(&raw) {
                Ok(colors) if !colors.is_empty() => {
                    entry.attach_colors(colors);
                    batch.hits.push(entry);
                }
                Ok(_) => {
                    debug!(key = %entry.cache_key, "cached value held no colors, treating as miss");
                    batch.misses.push(entry);
                }
                Err(error) => {
                    warn!(key = %entry.cache_key, %error, "undecodable cached value, treating as miss");
                    batch.misses.push(entry);
                }
            },
            None => batch.misses.push(entry),
        }
    }

    debug!(
        hits = batch.hits.len(),
        misses = batch.misses.len(),
        "partitioned entries by cache outcome"
    );
    Ok(batch)
}

/// Writes freshly extracted colors back to the store without blocking the
/// caller.
///
/// Failures are logged and swallowed: a missed write-back only costs a
/// re-extraction on the next run. The handle is returned so tests can await
/// completion.
pub fn spawn_write_back<S, C>(
    store: Arc<S>,
    codec: Arc<C>,
    writes: Vec<CacheWrite>,
) -> JoinHandle<()>
where
    S: ColorStore + 'static,
    C: ValueCodec + 'static,
{
    tokio::spawn(async move {
        let mut encoded = Vec::with_capacity(writes.len());
        for write in &writes {
            match codec.encode(&write.colors) {
                Ok(value) => encoded.push((write.key.clone(), value)),
                Err(error) => {
                    warn!(key = %write.key, %error, "skipping unencodable cache write")
                }
            }
        }

        if encoded.is_empty() {
            return;
        }
        match store.set_batch(&encoded).await {
            Ok(()) => debug!(count = encoded.len(), "wrote extracted colors back to store"),
            Err(error) => warn!(%error, "cache write-back failed"),
        }
    })
}
