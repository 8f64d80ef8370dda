//! Concurrent pipeline turning list entries into color-annotated entries.
//!
//! For each batch: one cache lookup splits the entries into hits and misses,
//! every miss fans out into a fetch-decode-extract task bounded by the
//! [`FetchLimiter`], and fresh extractions are written back to the cache
//! without blocking the caller.
//!
//! Failure handling is all-or-nothing. The first rate-limit error cancels
//! every in-flight sibling through a per-batch [`CancellationToken`] and
//! fails the batch; any other task error fails the batch after the remaining
//! tasks drain. Completed extractions are still written back on failure, so
//! a retry resumes instead of starting over.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod error;
mod limiter;
mod processor;

pub use error::PipelineError;
pub use limiter::{FetchLimiter, FetchPermit};
pub use processor::annotate_entries;

/// Configuration for the annotation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum concurrent poster fetches (default: 64).
    pub max_concurrent_fetches: usize,
    /// Cluster count requested from the extractor (default: 4). Must exceed
    /// the number of kept colors so near-duplicate shades can merge.
    pub candidate_colors: usize,
    /// Width posters are downscaled to before extraction (default: 80).
    pub target_width: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 64,
            candidate_colors: 4,
            target_width: 80,
        }
    }
}
