//! Network retrieval of remote configuration payloads.
//!
//! `RemoteSource` is the seam the loader fetches through; `HttpFetcher` is
//! the production implementation over HTTPS. Sources return raw bytes so the
//! loader can persist exactly what the server sent.

pub mod fetcher;

pub use fetcher::{HttpFetcher, RemoteSource};
