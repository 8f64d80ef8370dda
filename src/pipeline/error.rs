//! Error types for the color annotation pipeline.
//!
//! Any entry failure fails the whole batch: a partially annotated list
//! cannot be ranked, so there is no partial-success path to report.

use crate::cache::StoreError;
use crate::color::ExtractError;
use thiserror::Error;

/// Errors that can occur while annotating a batch of entries.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Batch cache lookup failed before any fetching started
    #[error("cache lookup failed: {0}")]
    Cache(#[from] StoreError),

    /// Poster fetch failed for one entry
    #[error("failed to fetch poster for {name}: {message}")]
    Fetch { name: String, message: String },

    /// The image host rate limited us; continuing would make it worse
    #[error("rate limited while fetching poster for {name}: {message}")]
    RateLimited { name: String, message: String },

    /// Poster bytes did not decode as an image
    #[error("failed to decode poster for {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: ExtractError,
    },

    /// Color extraction failed on a decoded poster
    #[error("failed to extract colors for {name}: {source}")]
    Extract {
        name: String,
        #[source]
        source: ExtractError,
    },

    /// Task observed the batch cancellation token
    #[error("batch cancelled after upstream rate limiting")]
    Cancelled,

    /// Internal error (e.g., worker task panicked)
    #[error("internal error: {0}")]
    Internal(String),
}
