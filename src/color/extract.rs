//! Dominant color extraction.
//!
//! Wraps the external k-means clustering call behind the [`ColorExtractor`]
//! trait so pipeline code can be tested with deterministic extractors. The
//! real implementation always asks the clustering call for more candidate
//! colors than it keeps; at most 3 colors survive, which bounds the cost of
//! every downstream ranking function.

use crate::color::Color;
use image::imageops::FilterType;
use image::RgbImage;
use kmeans_colors::{get_kmeans, Sort};
use palette::{IntoColor, Lab, Srgb};
use thiserror::Error;

/// Maximum number of colors kept per poster.
pub const MAX_KEPT_COLORS: usize = 3;

/// Errors that can occur while decoding or clustering a poster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// Image bytes could not be decoded as a raster format
    #[error("image decode failed: {0}")]
    Decode(String),

    /// Decoded image contains no pixels
    #[error("image has no pixels")]
    EmptyImage,

    /// Clustering returned no usable clusters
    #[error("clustering produced no colors")]
    NoColors,
}

/// Trait for dominant-color extraction.
///
/// Implementations return up to [`MAX_KEPT_COLORS`] colors ordered by
/// descending occurrence count. Extraction is synchronous CPU work; callers
/// run it inside a worker task.
pub trait ColorExtractor: Send + Sync {
    /// Extracts the dominant colors of a decoded, downscaled bitmap.
    ///
    /// # Arguments
    ///
    /// * `image` - The bitmap to cluster
    /// * `candidates` - Number of candidate clusters to request; the result
    ///   keeps at most [`MAX_KEPT_COLORS`] regardless
    fn extract(&self, image: &RgbImage, candidates: usize) -> Result<Vec<Color>, ExtractError>;
}

/// K-means extractor over the Lab color space.
#[derive(Debug, Clone)]
pub struct KmeansExtractor {
    /// Maximum iterations per clustering run
    pub max_iter: usize,
    /// Convergence threshold
    pub converge: f32,
    /// Seed for the centroid initializer, fixed for deterministic output
    pub seed: u64,
}

impl Default for KmeansExtractor {
    fn default() -> Self {
        Self {
            max_iter: 20,
            converge: 0.0025,
            seed: 0,
        }
    }
}

impl ColorExtractor for KmeansExtractor {
    fn extract(&self, image: &RgbImage, candidates: usize) -> Result<Vec<Color>, ExtractError> {
        let pixels: Vec<Lab> = image
            .pixels()
            .map(|p| Srgb::new(p[0], p[1], p[2]).into_format::<f32>().into_color())
            .collect();
        if pixels.is_empty() {
            return Err(ExtractError::EmptyImage);
        }

        // Always ask for more clusters than we keep
        let k = candidates.max(MAX_KEPT_COLORS + 1);
        let run = get_kmeans(k, self.max_iter, self.converge, false, &pixels, self.seed);

        let mut clusters = Lab::sort_indexed_colors(&run.centroids, &run.indices);
        clusters.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let total = pixels.len() as f32;
        let colors: Vec<Color> = clusters
            .into_iter()
            .take(MAX_KEPT_COLORS)
            .map(|c| Color::from_lab(c.centroid, (c.percentage * total).round() as u32))
            .collect();

        if colors.is_empty() {
            return Err(ExtractError::NoColors);
        }
        Ok(colors)
    }
}

/// Decodes poster bytes and downscales to `target_width` (aspect preserved).
///
/// Nearest-neighbor is deliberate: it keeps the original pixel population for
/// clustering instead of inventing blended colors.
pub fn decode_poster(bytes: &[u8], target_width: u32) -> Result<RgbImage, ExtractError> {
    let img = image::load_from_memory(bytes).map_err(|e| ExtractError::Decode(e.to_string()))?;
    let scaled = img.resize(target_width, 10_000, FilterType::Nearest);
    Ok(scaled.to_rgb8())
}
