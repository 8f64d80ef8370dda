//! Cache-aside storage for resolved poster colors.
//!
//! The cache maps a poster's cache key (film id plus poster version token) to
//! a compact string encoding of its dominant colors. Lookups that miss, or
//! that hold a value the codec cannot decode, fall through to the full
//! fetch-and-extract path; successful extractions are written back
//! asynchronously so callers never wait on the store.
//!
//! The wire format lives behind [`ValueCodec`] so the encoding can change
//! without touching any store implementation.

mod codec;
mod memory;
mod resolver;
mod store;

pub use codec::{CodecError, SlotCodec, ValueCodec, EMPTY_COLOR_SLOT, VALUE_SLOTS};
pub use memory::{MemoryStore, MemoryStoreConfig};
pub use resolver::{partition_by_cache, spawn_write_back, CacheWrite, ResolvedBatch};
pub use store::{validate_key, ColorStore, NoOpStore, StoreError};
