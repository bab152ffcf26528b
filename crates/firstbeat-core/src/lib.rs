//! Remote configuration loading for FirstBeat.
//!
//! Show formats, openings, warm-ups and suggestion pools are fetched from a
//! remote origin, cached on disk with a time-to-live, and served through a
//! chain of fallbacks so the app always has something to show:
//!
//! - [`ConfigLoader`]: valid cache (with background refresh), then remote,
//!   then stale cache, then the bundled default
//! - [`CacheStore`]: atomic file-backed payload and metadata storage
//! - [`HttpFetcher`]: one HTTPS GET per fetch, status must be 200
//! - [`LocalDefaults`]: payloads compiled into the binary
//! - [`Catalog`]: typed accessors for each resource
//!
//! ```ignore
//! let catalog = Catalog::from_config(&Config::load()?)?;
//! let formats = catalog.formats().await;
//! ```

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod models;
pub mod remote;
pub mod resource;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CacheMetadata, CacheStatus, CacheStore};
pub use catalog::{Catalog, PreloadReport};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use defaults::LocalDefaults;
pub use error::RemoteConfigError;
pub use loader::{ConfigLoader, LoadOutcome, Provenance};
pub use remote::{HttpFetcher, RemoteSource};
pub use resource::{ResourceDescriptor, Resources};
