//! Fan-out annotation of cache-missed entries.

use super::error::PipelineError;
use super::limiter::FetchLimiter;
use super::PipelineConfig;
use crate::cache::{partition_by_cache, spawn_write_back, CacheWrite, ColorStore, ValueCodec};
use crate::color::{decode_poster, ColorExtractor};
use crate::model::Entry;
use crate::provider::{PosterSource, ProviderError};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Annotates every entry in the batch with its poster colors and ranking
/// keys.
///
/// Cache hits skip straight through; misses fetch, decode, and extract
/// concurrently. On success the returned entries are in list order and every
/// one of them has colors attached.
///
/// # Errors
///
/// Fails the whole batch on the first task failure. A rate-limit error takes
/// precedence over any other failure and cancels all in-flight siblings.
/// Extractions completed before the failure are still written back to the
/// store.
#[instrument(skip_all, fields(entries = entries.len()))]
pub async fn annotate_entries<S, C, P, X>(
    store: Arc<S>,
    codec: Arc<C>,
    source: Arc<P>,
    extractor: Arc<X>,
    config: &PipelineConfig,
    entries: Vec<Entry>,
) -> Result<Vec<Entry>, PipelineError>
where
    S: ColorStore + 'static,
    C: ValueCodec + 'static,
    P: PosterSource + 'static,
    X: ColorExtractor + 'static,
{
    let batch = partition_by_cache(store.as_ref(), codec.as_ref(), entries).await?;
    let mut annotated = batch.hits;
    if batch.misses.is_empty() {
        annotated.sort_by_key(|e| e.list_position);
        return Ok(annotated);
    }

    let limiter = Arc::new(FetchLimiter::new(config.max_concurrent_fetches));
    let token = CancellationToken::new();
    let mut tasks = JoinSet::new();

    for entry in batch.misses {
        let source = Arc::clone(&source);
        let extractor = Arc::clone(&extractor);
        let limiter = Arc::clone(&limiter);
        let token = token.clone();
        let config = config.clone();

        tasks.spawn(async move {
            annotate_one(entry, source, extractor, limiter, token, config).await
        });
    }

    let mut writes: Vec<CacheWrite> = Vec::new();
    let mut rate_limited: Option<PipelineError> = None;
    let mut first_error: Option<PipelineError> = None;

    // Drain every task: blocked siblings notice the token and return fast,
    // and finished extractions must be kept for write-back either way.
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok((entry, write))) => {
                writes.push(write);
                annotated.push(entry);
            }
            Ok(Err(error @ PipelineError::RateLimited { .. })) => {
                if rate_limited.is_none() {
                    warn!(%error, "rate limited, cancelling remaining fetches");
                    token.cancel();
                    rate_limited = Some(error);
                }
            }
            Ok(Err(PipelineError::Cancelled)) => {}
            Ok(Err(error)) => {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
            Err(join_error) => {
                if !join_error.is_cancelled() && first_error.is_none() {
                    first_error =
                        Some(PipelineError::Internal(format!("task panicked: {join_error}")));
                }
            }
        }
    }

    if !writes.is_empty() {
        debug!(count = writes.len(), "scheduling cache write-back");
        spawn_write_back(store, codec, writes);
    }

    // Rate limiting outranks other failures so callers can back off
    if let Some(error) = rate_limited {
        return Err(error);
    }
    if let Some(error) = first_error {
        return Err(error);
    }

    annotated.sort_by_key(|e| e.list_position);
    Ok(annotated)
}

/// Fetches, decodes, and extracts for a single entry.
async fn annotate_one<P, X>(
    mut entry: Entry,
    source: Arc<P>,
    extractor: Arc<X>,
    limiter: Arc<FetchLimiter>,
    token: CancellationToken,
    config: PipelineConfig,
) -> Result<(Entry, CacheWrite), PipelineError>
where
    P: PosterSource,
    X: ColorExtractor,
{
    let _permit = tokio::select! {
        biased;

        _ = token.cancelled() => return Err(PipelineError::Cancelled),
        permit = limiter.acquire() => permit,
    };

    let bytes = tokio::select! {
        biased;

        _ = token.cancelled() => return Err(PipelineError::Cancelled),
        result = source.fetch(&entry) => result.map_err(|error| match error {
            ProviderError::RateLimited(message) => PipelineError::RateLimited {
                name: entry.name.clone(),
                message,
            },
            other => PipelineError::Fetch {
                name: entry.name.clone(),
                message: other.to_string(),
            },
        })?,
    };

    let image = decode_poster(&bytes, config.target_width).map_err(|source| {
        PipelineError::Decode {
            name: entry.name.clone(),
            source,
        }
    })?;
    let colors = extractor
        .extract(&image, config.candidate_colors)
        .map_err(|source| PipelineError::Extract {
            name: entry.name.clone(),
            source,
        })?;

    let write = CacheWrite {
        key: entry.cache_key.clone(),
        colors: colors.clone(),
    };
    entry.attach_colors(colors);
    Ok((entry, write))
}
