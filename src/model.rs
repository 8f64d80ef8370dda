//! Core data model for list entries.
//!
//! An [`Entry`] identifies one film in a list. Entries are created when list
//! pages are fetched; color and ranking data are attached later as a single
//! append-only transform ([`Entry::attach_colors`]) so an entry with a
//! non-empty color list always carries the matching ranking keys as well.

use crate::color::Color;
use crate::ranking::SortVals;
use serde::{Deserialize, Serialize};

/// Summary information about one of the user's lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    /// Opaque version token; the list API rejects updates computed against a
    /// stale version.
    pub version: i64,
    pub film_count: usize,
    #[serde(default)]
    pub description: String,
}

/// A poster reference plus its resolved dominant colors.
///
/// An empty color list is the valid pre-extraction state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    /// Poster source URL.
    pub path: String,
    /// Dominant colors, ordered by descending occurrence count; index 0 is
    /// the dominant color.
    #[serde(default)]
    pub colors: Vec<Color>,
}

/// One film entry in a list.
///
/// Identifiers are immutable once created; color and ranking data are the
/// only fields mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// External entry identifier. Numeric for the list API we target, and
    /// used as a proxy for the entry's current absolute position when
    /// planning a reorder.
    pub entry_id: String,
    /// Stable film identifier.
    pub film_id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub release_year: i32,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub poster_customisable: bool,
    /// Standard poster URL.
    pub poster_url: String,
    /// Adult poster URL; empty unless the film is flagged adult.
    #[serde(default)]
    pub adult_poster_url: String,
    /// Zero-based position of this entry in the fetched list.
    pub list_position: usize,
    /// Cache key: `{film_id}_{poster version token}`. A changed poster image
    /// yields a new key rather than a stale hit.
    pub cache_key: String,
    pub image_info: ImageInfo,
    /// Ranking keys, present exactly when `image_info.colors` is non-empty.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sort_vals: Option<SortVals>,
}

impl Entry {
    /// Attaches extraction results to this entry.
    ///
    /// Colors and ranking keys are populated together so the two can never
    /// get out of sync.
    pub fn attach_colors(&mut self, colors: Vec<Color>) {
        self.sort_vals = Some(SortVals::compute(&colors));
        self.image_info.colors = colors;
    }

    /// Returns true once colors (and therefore ranking keys) are attached.
    pub fn has_colors(&self) -> bool {
        !self.image_info.colors.is_empty()
    }
}

/// Builds a bare entry for tests elsewhere in the crate.
#[cfg(test)]
pub fn test_entry(entry_id: &str, film_id: &str, name: &str, position: usize) -> Entry {
    Entry {
        entry_id: entry_id.to_string(),
        film_id: film_id.to_string(),
        name: name.to_string(),
        release_year: 2001,
        adult: false,
        poster_customisable: false,
        poster_url: format!("https://posters.example/{film_id}.jpg?v=abc"),
        adult_poster_url: String::new(),
        list_position: position,
        cache_key: format!("{film_id}_abc"),
        image_info: ImageInfo {
            path: format!("https://posters.example/{film_id}.jpg?v=abc"),
            colors: Vec::new(),
        },
        sort_vals: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_colors_populates_both_fields() {
        let mut entry = test_entry("0", "f1", "Film One", 0);
        assert!(!entry.has_colors());
        assert!(entry.sort_vals.is_none());

        let colors = vec![Color::from_hex("#ff0000", 3000).unwrap()];
        entry.attach_colors(colors);

        assert!(entry.has_colors());
        assert!(entry.sort_vals.is_some());
        assert_eq!(entry.image_info.colors.len(), 1);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = test_entry("0", "f1", "Film One", 0);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("entryId").is_some());
        assert!(json.get("filmId").is_some());
        assert!(json.get("cacheKey").is_some());
        // Absent ranking keys are omitted entirely
        assert!(json.get("sortVals").is_none());
    }
}
