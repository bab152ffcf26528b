//! File-backed cache for remote configuration payloads.
//!
//! Each resource occupies two files in the cache namespace directory:
//! `<cache_key>` holds the raw response bytes and `<cache_key>.metadata`
//! holds a small JSON record with the cached-at and expires-at times.
//! Both are written with an atomic replace, but independently of each other.

pub mod metadata;
pub mod store;

pub use metadata::{CacheMetadata, CacheStatus};
pub use store::CacheStore;
