//! Client for the external list API.
//!
//! Entry pages are fetched concurrently: a metadata preflight returns the
//! film count, every page offset is dispatched at once, and the assembled
//! result only counts as complete if at least one page reported an empty
//! `next` cursor. The API's absolute-position update endpoint is reached via
//! POST with an `X-HTTP-Method-Override: PATCH` header.

use super::http::AsyncHttpClient;
use super::ProviderError;
use crate::model::{Entry, ImageInfo, ListSummary};
use crate::reorder::ListUpdateRequest;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Page size for entry pagination.
const ENTRIES_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct ListsResponse {
    items: Vec<ListSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    film_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntriesPage {
    items: Vec<EntryItem>,
    /// Cursor for the following page; empty or absent on the final page.
    #[serde(default)]
    next: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryItem {
    entry_id: String,
    film: Film,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Film {
    id: String,
    name: String,
    #[serde(default)]
    adult: bool,
    #[serde(default)]
    poster_customisable: bool,
    #[serde(default)]
    release_year: i32,
    poster: CoverImage,
    #[serde(default)]
    adult_poster: CoverImage,
}

#[derive(Debug, Default, Deserialize)]
struct CoverImage {
    sizes: Vec<ImageSize>,
}

#[derive(Debug, Deserialize)]
struct ImageSize {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListUpdateResponse {
    #[serde(default)]
    messages: Vec<ListUpdateMessage>,
}

#[derive(Debug, Deserialize)]
struct ListUpdateMessage {
    #[serde(rename = "type")]
    kind: String,
    code: String,
    title: String,
}

/// Authenticated client for one user's lists.
pub struct ListClient<C> {
    http: C,
    base_url: String,
    access_token: String,
}

impl<C: AsyncHttpClient> ListClient<C> {
    /// Creates a client against the given API base URL.
    pub fn new(http: C, base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            access_token: access_token.into(),
        }
    }

    /// Fetches summaries of the lists the member owns.
    #[instrument(skip(self))]
    pub async fn user_lists(&self, member_id: &str) -> Result<Vec<ListSummary>, ProviderError> {
        let url = format!(
            "{}/lists?member={}&memberRelationship=Owner&perPage={}",
            self.base_url, member_id, ENTRIES_PER_PAGE
        );
        let body = self.http.get_with_bearer(&url, &self.access_token).await?;
        let response: ListsResponse = decode(&body)?;
        debug!(member_id, lists = response.items.len(), "fetched user lists");
        Ok(response.items)
    }

    /// Fetches the film count from the list's metadata.
    pub async fn film_count(&self, list_id: &str) -> Result<usize, ProviderError> {
        let url = format!("{}/list/{}", self.base_url, list_id);
        let body = self.http.get_with_bearer(&url, &self.access_token).await?;
        let meta: ListMeta = decode(&body)?;
        Ok(meta.film_count)
    }

    /// Fetches every entry of a list, in list order.
    ///
    /// All pages implied by the film count are requested concurrently. If no
    /// page reports an empty `next` cursor the count was stale and pages may
    /// be missing, so the whole fetch fails rather than return a truncated
    /// list.
    #[instrument(skip(self))]
    pub async fn entries(&self, list_id: &str) -> Result<Vec<Entry>, ProviderError> {
        let film_count = self.film_count(list_id).await?;
        if film_count == 0 {
            return Ok(Vec::new());
        }

        let offsets: Vec<usize> = (0..film_count).step_by(ENTRIES_PER_PAGE).collect();
        let pages = try_join_all(
            offsets
                .iter()
                .map(|&offset| self.fetch_entries_page(list_id, offset)),
        )
        .await?;

        if !pages.iter().any(|page| page.next.is_empty()) {
            warn!(list_id, film_count, "no entries page reported itself final");
            return Err(ProviderError::IncompletePagination(list_id.to_string()));
        }

        let mut entries = Vec::with_capacity(film_count);
        for item in pages.into_iter().flat_map(|page| page.items) {
            let position = entries.len();
            entries.push(build_entry(item, position)?);
        }

        debug!(list_id, entries = entries.len(), "fetched list entries");
        Ok(entries)
    }

    async fn fetch_entries_page(
        &self,
        list_id: &str,
        offset: usize,
    ) -> Result<EntriesPage, ProviderError> {
        let url = format!(
            "{}/list/{}/entries?cursor=start%3D{}&perPage={}",
            self.base_url, list_id, offset, ENTRIES_PER_PAGE
        );
        let body = self.http.get_with_bearer(&url, &self.access_token).await?;
        decode(&body)
    }

    /// Applies a reorder plan to the list.
    ///
    /// A 2xx response can still carry error messages in its body; those are
    /// surfaced as [`ProviderError::Rejected`].
    #[instrument(skip(self, request), fields(moves = request.entries.len()))]
    pub async fn update(
        &self,
        list_id: &str,
        request: &ListUpdateRequest,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/list/{}", self.base_url, list_id);
        let body = serde_json::to_string(request)
            .map_err(|e| ProviderError::InvalidResponse(format!("unserializable update: {}", e)))?;
        let bearer = format!("Bearer {}", self.access_token);
        let headers = [
            ("Authorization", bearer.as_str()),
            ("X-HTTP-Method-Override", "PATCH"),
        ];

        let response = self.http.post_json(&url, &body, &headers).await?;
        let parsed: ListUpdateResponse = decode(&response)?;
        if !parsed.messages.is_empty() {
            let joined: Vec<String> = parsed
                .messages
                .iter()
                .map(|m| format!("{}: {} - {}", m.kind, m.code, m.title))
                .collect();
            return Err(ProviderError::Rejected(joined.join("; ")));
        }

        debug!(list_id, "list update accepted");
        Ok(())
    }
}

fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("JSON decode failed: {}", e)))
}

/// Extracts the poster version token from the `v` query parameter.
pub fn poster_version(poster_url: &str) -> Result<String, ProviderError> {
    let parsed = reqwest::Url::parse(poster_url)
        .map_err(|_| ProviderError::MissingVersionToken(poster_url.to_string()))?;
    parsed
        .query_pairs()
        .find(|(name, _)| name == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::MissingVersionToken(poster_url.to_string()))
}

fn build_entry(item: EntryItem, position: usize) -> Result<Entry, ProviderError> {
    let poster_url = item
        .film
        .poster
        .sizes
        .first()
        .map(|size| size.url.clone())
        .ok_or_else(|| {
            ProviderError::InvalidResponse(format!("film {} has no poster sizes", item.film.id))
        })?;

    // Adult films hide their real artwork behind a separate poster field
    let mut adult_poster_url = String::new();
    let mut image_path = poster_url.clone();
    if item.film.adult {
        adult_poster_url = item
            .film
            .adult_poster
            .sizes
            .first()
            .map(|size| size.url.clone())
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!(
                    "adult film {} has no adult poster sizes",
                    item.film.id
                ))
            })?;
        image_path = adult_poster_url.clone();
    }

    let version = poster_version(&image_path)?;

    Ok(Entry {
        entry_id: item.entry_id,
        film_id: item.film.id.clone(),
        name: item.film.name,
        release_year: item.film.release_year,
        adult: item.film.adult,
        poster_customisable: item.film.poster_customisable,
        poster_url,
        adult_poster_url,
        list_position: position,
        cache_key: format!("{}_{}", item.film.id, version),
        image_info: ImageInfo {
            path: image_path,
            colors: Vec::new(),
        },
        sort_vals: None,
    })
}
