//! Chromalist - color-ordered sorting for externally-hosted film lists
//!
//! This library turns a user's film list into a color-sorted one: it resolves
//! the dominant colors of every poster in the list (through a cache-aside
//! concurrent pipeline), computes a set of ranking keys per entry, and
//! converts the chosen final ordering into the minimal sequence of move
//! instructions the external list API understands.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use chromalist::service::SortService;
//! use chromalist::ranking::RankMethod;
//!
//! let service = SortService::new(store, codec, posters, extractor, config);
//!
//! // Attach colors and ranking keys to every entry
//! let entries = service.resolve_colors(entries).await?;
//!
//! // Plan the move instructions for a hue-ordered list
//! let update = service.plan_reorder(version, entries, RankMethod::Hue, 0, false)?;
//! ```

pub mod cache;
pub mod color;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod ranking;
pub mod reorder;
pub mod service;

/// Version of the chromalist library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
