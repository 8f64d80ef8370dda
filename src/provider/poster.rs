//! Poster image source abstraction.

use super::http::AsyncHttpClient;
use super::ProviderError;
use crate::model::Entry;
use std::future::Future;
use tracing::trace;

/// Source of raw poster image bytes.
///
/// Split from the list API because poster images live on an unauthenticated
/// CDN, and because the pipeline tests substitute canned images here.
pub trait PosterSource: Send + Sync {
    /// Fetches the encoded poster image for an entry.
    fn fetch(&self, entry: &Entry) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Poster source fetching over HTTP.
pub struct HttpPosterSource<C> {
    http: C,
}

impl<C: AsyncHttpClient> HttpPosterSource<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }
}

impl<C: AsyncHttpClient> PosterSource for HttpPosterSource<C> {
    async fn fetch(&self, entry: &Entry) -> Result<Vec<u8>, ProviderError> {
        trace!(film_id = %entry.film_id, url = %entry.image_info.path, "fetching poster");
        self.http.get(&entry.image_info.path).await
    }
}
