//! External list and poster providers.
//!
//! Two upstream surfaces live here: the list API (list summaries, entry
//! pages, reorder updates) and the poster image host. Both sit behind the
//! [`AsyncHttpClient`] abstraction so tests can run against canned responses.

mod http;
mod list;
mod poster;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use list::{poster_version, ListClient};
pub use poster::{HttpPosterSource, PosterSource};

use thiserror::Error;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream responded 429; the whole batch should stop
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The list API accepted the request but reported errors
    #[error("list update rejected: {0}")]
    Rejected(String),

    /// No entries page reported itself final, so pages may be missing
    #[error("failed to retrieve all entries for list {0}")]
    IncompletePagination(String),

    /// Poster URL has no version token to build a cache key from
    #[error("poster url {0:?} has no version token")]
    MissingVersionToken(String),
}
