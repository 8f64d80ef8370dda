//! High-level facade tying the pipeline, ranking, and reorder planning
//! together.

use crate::cache::{ColorStore, ValueCodec};
use crate::color::ColorExtractor;
use crate::model::Entry;
use crate::pipeline::{annotate_entries, PipelineConfig, PipelineError};
use crate::provider::PosterSource;
use crate::ranking::RankMethod;
use crate::reorder::{plan_update, ListUpdateRequest, ReorderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from the service facade.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Color resolution failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Reorder planning failed
    #[error(transparent)]
    Reorder(#[from] ReorderError),

    /// An entry reached ranking without colors attached
    #[error("entry {0:?} has no ranking keys; resolve colors first")]
    UnrankedEntry(String),
}

/// One-stop service for color-sorting a list.
///
/// Holds the store, codec, poster source, and extractor behind `Arc`s so the
/// pipeline tasks can share them.
pub struct SortService<S, C, P, X> {
    store: Arc<S>,
    codec: Arc<C>,
    posters: Arc<P>,
    extractor: Arc<X>,
    config: PipelineConfig,
}

impl<S, C, P, X> SortService<S, C, P, X>
where
    S: ColorStore + 'static,
    C: ValueCodec + 'static,
    P: PosterSource + 'static,
    X: ColorExtractor + 'static,
{
    pub fn new(
        store: Arc<S>,
        codec: Arc<C>,
        posters: Arc<P>,
        extractor: Arc<X>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            codec,
            posters,
            extractor,
            config,
        }
    }

    /// Attaches colors and ranking keys to every entry.
    ///
    /// See [`annotate_entries`] for the batch failure semantics.
    pub async fn resolve_colors(&self, entries: Vec<Entry>) -> Result<Vec<Entry>, PipelineError> {
        annotate_entries(
            Arc::clone(&self.store),
            Arc::clone(&self.codec),
            Arc::clone(&self.posters),
            Arc::clone(&self.extractor),
            &self.config,
            entries,
        )
        .await
    }

    /// Sorts entries by the chosen ranking method and plans the move
    /// instructions producing that order.
    ///
    /// Ties keep their relative list order so repeated runs are stable.
    #[instrument(skip(self, entries), fields(entries = entries.len(), method = %method))]
    pub fn plan_reorder(
        &self,
        version: i64,
        mut entries: Vec<Entry>,
        method: RankMethod,
        offset: i64,
        reverse: bool,
    ) -> Result<ListUpdateRequest, ServiceError> {
        for entry in &entries {
            if entry.sort_vals.is_none() {
                return Err(ServiceError::UnrankedEntry(entry.name.clone()));
            }
        }

        entries.sort_by_key(|entry| {
            entry
                .sort_vals
                .as_ref()
                .map(|vals| method.key(vals))
                .unwrap_or_default()
        });

        let request = plan_update(&entries, version, offset, reverse)?;
        debug!(moves = request.entries.len(), "planned reorder");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, NoOpStore, SlotCodec};
    use crate::color::{Color, KmeansExtractor};
    use crate::model::test_entry;
    use crate::provider::ProviderError;
    use crate::ranking::SortVals;

    struct NoPosters;

    impl PosterSource for NoPosters {
        async fn fetch(&self, entry: &Entry) -> Result<Vec<u8>, ProviderError> {
            Err(ProviderError::Http(format!("no poster for {}", entry.film_id)))
        }
    }

    fn service() -> SortService<NoOpStore, SlotCodec, NoPosters, KmeansExtractor> {
        SortService::new(
            Arc::new(NoOpStore::new()),
            Arc::new(SlotCodec::new()),
            Arc::new(NoPosters),
            Arc::new(KmeansExtractor::default()),
            PipelineConfig::default(),
        )
    }

    fn ranked_entry(entry_id: &str, film_id: &str, hue: i64) -> Entry {
        let mut entry = test_entry(entry_id, film_id, film_id, 0);
        entry.sort_vals = Some(SortVals {
            hue,
            ..SortVals::default()
        });
        entry.image_info.colors = vec![Color::from_hex("#ff0000", 1).unwrap()];
        entry
    }

    #[test]
    fn test_plan_reorder_sorts_by_method_key() {
        let entries = vec![
            ranked_entry("0", "a", 300),
            ranked_entry("1", "b", 100),
            ranked_entry("2", "c", 200),
        ];

        // Sorted by hue the order is b, c, a: pull b then c head-ward
        let request = service()
            .plan_reorder(5, entries, RankMethod::Hue, 0, false)
            .unwrap();
        assert_eq!(request.version, 5);
        assert_eq!(request.entries.len(), 2);
        assert_eq!(request.entries[0].position, 1);
        assert_eq!(request.entries[0].new_position, 0);
    }

    #[test]
    fn test_plan_reorder_rejects_unranked_entries() {
        let entries = vec![test_entry("0", "a", "Film A", 0)];
        let err = service()
            .plan_reorder(5, entries, RankMethod::Hue, 0, false)
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnrankedEntry(_)));
    }

    #[tokio::test]
    async fn test_resolve_colors_passes_cached_entries_through() {
        // All entries are cache hits, so the failing poster source is never
        // consulted
        let store = Arc::new(MemoryStore::with_defaults());
        let codec = Arc::new(SlotCodec::new());
        store
            .set("100_abc", "#3264c80500,XXXXXXX0000,XXXXXXX0000")
            .await
            .unwrap();

        let service = SortService::new(
            store,
            codec,
            Arc::new(NoPosters),
            Arc::new(KmeansExtractor::default()),
            PipelineConfig::default(),
        );

        let entries = vec![test_entry("0", "100", "Cached", 0)];
        let resolved = service.resolve_colors(entries).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].has_colors());
        assert!(resolved[0].sort_vals.is_some());
    }

    #[tokio::test]
    async fn test_resolve_colors_fails_whole_batch_on_fetch_error() {
        let service = service();
        let entries = vec![test_entry("0", "100", "Missing", 0)];
        let err = service.resolve_colors(entries).await.unwrap_err();
        assert!(matches!(err, PipelineError::Fetch { .. }));
    }
}
