//! Cache-first loading with layered fallbacks.
//!
//! `ConfigLoader::load` resolves a resource through these tiers, in order:
//!
//! 1. A valid (unexpired) cache entry. It is returned immediately and a
//!    detached task refreshes the cache in the background.
//! 2. A synchronous remote fetch, persisted to the cache on success.
//! 3. The existing cache entry regardless of expiry (stale).
//! 4. The bundled default payload.
//!
//! Every tier absorbs its own errors; callers see a value or `None`.
//!
//! All disk access for one cache key goes through that key's async mutex, so
//! reads and writes of a resource are linearized while different resources
//! stay independent. The file operations themselves run on the blocking
//! pool. Network I/O never happens under the lock. Each fetch
//! takes a ticket when it starts, and a fetch only persists if no
//! later-started fetch has already written, so a slow background refresh
//! cannot replace newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheMetadata, CacheStatus, CacheStore};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, DEFAULT_CACHE_TTL_SECS, MAX_CACHE_TTL_SECS};
use crate::defaults::LocalDefaults;
use crate::error::RemoteConfigError;
use crate::remote::{HttpFetcher, RemoteSource};
use crate::resource::ResourceDescriptor;

/// Which tier produced a load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Cache,
    Remote,
    StaleCache,
    Bundled,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Cache(T),
    Remote(T),
    StaleCache(T),
    Bundled(T),
    Unavailable,
}

impl<T> LoadOutcome<T> {
    pub fn provenance(&self) -> Provenance {
        match self {
            LoadOutcome::Cache(_) => Provenance::Cache,
            LoadOutcome::Remote(_) => Provenance::Remote,
            LoadOutcome::StaleCache(_) => Provenance::StaleCache,
            LoadOutcome::Bundled(_) => Provenance::Bundled,
            LoadOutcome::Unavailable => Provenance::Unavailable,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadOutcome::Cache(v)
            | LoadOutcome::Remote(v)
            | LoadOutcome::StaleCache(v)
            | LoadOutcome::Bundled(v) => Some(v),
            LoadOutcome::Unavailable => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            LoadOutcome::Cache(v)
            | LoadOutcome::Remote(v)
            | LoadOutcome::StaleCache(v)
            | LoadOutcome::Bundled(v) => Some(v),
            LoadOutcome::Unavailable => None,
        }
    }
}

/// Per-key coordination state.
#[derive(Default)]
struct KeyState {
    /// Guards disk access; holds the ticket of the fetch whose payload is on disk.
    written: Mutex<u64>,
    next_ticket: AtomicU64,
}

struct Inner {
    store: CacheStore,
    fetcher: Arc<dyn RemoteSource>,
    defaults: LocalDefaults,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    keys: DashMap<String, Arc<KeyState>>,
}

/// Entry point for loading remote configuration resources.
/// Clone is cheap - all state is shared behind an Arc.
#[derive(Clone)]
pub struct ConfigLoader {
    inner: Arc<Inner>,
}

impl ConfigLoader {
    pub fn new(store: CacheStore, fetcher: Arc<dyn RemoteSource>, defaults: LocalDefaults) -> Self {
        Self::with_options(
            store,
            fetcher,
            defaults,
            Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            Arc::new(SystemClock),
        )
    }

    pub fn with_options(
        store: CacheStore,
        fetcher: Arc<dyn RemoteSource>,
        defaults: LocalDefaults,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                fetcher,
                defaults,
                ttl: ttl.clamp(Duration::seconds(1), Duration::seconds(MAX_CACHE_TTL_SECS)),
                clock,
                keys: DashMap::new(),
            }),
        }
    }

    /// Production loader: HTTPS fetcher, cache under the configured directory,
    /// bundled defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
        let cache_dir = config.cache_dir()?;
        debug!(?cache_dir, "Cache directory configured");
        Ok(Self::with_options(
            CacheStore::new(cache_dir),
            Arc::new(fetcher),
            LocalDefaults::bundled(),
            config.cache_ttl(),
            Arc::new(SystemClock),
        ))
    }

    pub fn store(&self) -> &CacheStore {
        &self.inner.store
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    fn key_state(&self, key: &str) -> Arc<KeyState> {
        self.inner
            .keys
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    // ===== Public API =====

    /// Load a resource, or `None` if every tier failed.
    pub async fn load<T>(&self, descriptor: &ResourceDescriptor<T>) -> Option<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.load_with_source(descriptor).await.into_value()
    }

    /// Same as [`load`](Self::load), reporting which tier answered.
    pub async fn load_with_source<T>(&self, descriptor: &ResourceDescriptor<T>) -> LoadOutcome<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let key = descriptor.cache_key();
        let state = self.key_state(key);
        let now = self.inner.clock.now();

        let fresh = {
            let _disk = state.written.lock().await;
            match self.read_metadata(key).await {
                Some(metadata) if !metadata.is_expired_at(now) => {
                    self.decode_cached(descriptor).await.map(|value| (metadata, value))
                }
                Some(metadata) => {
                    info!(key, cached_at = %metadata.cached_at, "Cache expired, fetching fresh data");
                    None
                }
                None => None,
            }
        };

        if let Some((metadata, value)) = fresh {
            let remaining = (metadata.expires_at - now).num_seconds();
            info!(key, expires_in_secs = remaining, "Loaded from cache");
            self.spawn_refresh(descriptor.clone());
            return LoadOutcome::Cache(value);
        }

        match self.fetch_and_cache(descriptor).await {
            Ok(value) => {
                info!(key, "Loaded from remote");
                return LoadOutcome::Remote(value);
            }
            Err(e) => {
                warn!(key, category = e.category(), error = %e, "Remote fetch failed");
            }
        }

        let stale = {
            let _disk = state.written.lock().await;
            self.decode_cached(descriptor).await
        };
        if let Some(value) = stale {
            warn!(key, "Using stale cache (remote fetch failed)");
            return LoadOutcome::StaleCache(value);
        }

        match self.inner.defaults.load(descriptor) {
            Ok(value) => {
                warn!(key, "Loaded bundled default (fallback)");
                LoadOutcome::Bundled(value)
            }
            Err(e) => {
                error!(key, category = e.category(), error = %e, "Failed to load from all sources");
                LoadOutcome::Unavailable
            }
        }
    }

    /// Current cache state from metadata alone. Never fetches or mutates.
    pub fn cache_status<T>(&self, descriptor: &ResourceDescriptor<T>) -> CacheStatus {
        let key = descriptor.cache_key();
        match self.inner.store.read_metadata(key) {
            Ok(Some(metadata)) => metadata.status_at(self.inner.clock.now()),
            Ok(None) => CacheStatus::NotCached,
            Err(e) => {
                warn!(key, category = e.category(), error = %e, "Failed to load cache metadata");
                CacheStatus::NotCached
            }
        }
    }

    /// Delete payload and metadata for one resource. Fetches that started
    /// before the clear will not write their results back.
    pub async fn clear_cache<T>(&self, descriptor: &ResourceDescriptor<T>) {
        let key = descriptor.cache_key();
        let state = self.key_state(key);
        let mut written = state.written.lock().await;
        *written = state.next_ticket.load(Ordering::SeqCst);
        let owned = key.to_string();
        match self.on_store(move |store| store.delete(&owned)).await {
            Ok(()) => info!(key, "Cleared cache"),
            Err(e) => warn!(key, category = e.category(), error = %e, "Failed to clear cache"),
        }
    }

    /// Delete the whole cache namespace and recreate it empty.
    pub async fn clear_all_cache(&self) {
        let states: Vec<Arc<KeyState>> = self
            .inner
            .keys
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        // Callers never hold more than one key lock, so taking them all is safe
        let mut guards = Vec::with_capacity(states.len());
        for state in &states {
            let mut written = state.written.lock().await;
            *written = state.next_ticket.load(Ordering::SeqCst);
            guards.push(written);
        }

        match self.on_store(|store| store.delete_all()).await {
            Ok(()) => info!("Cleared all cache"),
            Err(e) => warn!(category = e.category(), error = %e, "Failed to clear all cache"),
        }
    }

    // ===== Tiers =====

    /// Fetch, decode, and persist. The bytes are only cached once they decode.
    async fn fetch_and_cache<T>(&self, descriptor: &ResourceDescriptor<T>) -> Result<T, RemoteConfigError>
    where
        T: DeserializeOwned,
    {
        let key = descriptor.cache_key();
        let state = self.key_state(key);
        let ticket = state.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let bytes = self.inner.fetcher.fetch(descriptor.remote_url()).await?;
        let value: T = serde_json::from_slice(&bytes).map_err(|e| RemoteConfigError::decode(key, e))?;

        self.persist(key, &state, ticket, bytes).await;
        Ok(value)
    }

    async fn persist(&self, key: &str, state: &KeyState, ticket: u64, bytes: Vec<u8>) {
        let mut written = state.written.lock().await;
        if ticket <= *written {
            debug!(key, ticket, "Skipping cache write, a newer fetch already stored");
            return;
        }

        let now = self.inner.clock.now();
        let Some(metadata) = CacheMetadata::new(key, now, self.inner.ttl) else {
            warn!(
                key,
                cached_at = %now,
                ttl_secs = self.inner.ttl.num_seconds(),
                "Cache expiry out of range, skipping cache write"
            );
            return;
        };
        let owned = key.to_string();
        let stored = self
            .on_store(move |store| {
                store.write(&owned, &bytes)?;
                store.write_metadata(&metadata)
            })
            .await;
        if let Err(e) = stored {
            warn!(key, category = e.category(), error = %e, "Failed to cache payload");
            return;
        }
        *written = ticket;
        info!(key, expires_in_mins = self.inner.ttl.num_minutes(), "Cached remote payload");
    }

    /// Refresh on a detached task. No handle is kept; failures are logged.
    fn spawn_refresh<T>(&self, descriptor: ResourceDescriptor<T>)
    where
        T: DeserializeOwned + Send + 'static,
    {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(key = descriptor.cache_key(), "No async runtime, skipping background refresh");
            return;
        };

        let loader = self.clone();
        handle.spawn(async move {
            let key = descriptor.cache_key();
            match loader.fetch_and_cache(&descriptor).await {
                Ok(_) => debug!(key, "Background refresh complete"),
                Err(e) => warn!(key, category = e.category(), error = %e, "Background refresh failed"),
            }
        });
    }

    // ===== Disk helpers (callers hold the key lock) =====

    /// Run a store operation on the blocking pool.
    async fn on_store<R, F>(&self, op: F) -> Result<R, RemoteConfigError>
    where
        F: FnOnce(&CacheStore) -> Result<R, RemoteConfigError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.inner.store.clone();
        match tokio::task::spawn_blocking(move || op(&store)).await {
            Ok(result) => result,
            Err(e) => Err(RemoteConfigError::io(
                self.inner.store.cache_dir(),
                std::io::Error::other(e),
            )),
        }
    }

    async fn read_metadata(&self, key: &str) -> Option<CacheMetadata> {
        let owned = key.to_string();
        match self.on_store(move |store| store.read_metadata(&owned)).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(key, category = e.category(), error = %e, "Failed to load cache metadata");
                None
            }
        }
    }

    async fn decode_cached<T: DeserializeOwned>(&self, descriptor: &ResourceDescriptor<T>) -> Option<T> {
        let key = descriptor.cache_key();
        let owned = key.to_string();
        let bytes = match self.on_store(move |store| store.read(&owned)).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, category = e.category(), error = %e, "Cache read failed");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                let e = RemoteConfigError::decode(key, e);
                warn!(key, category = e.category(), error = %e, "Cache decode failed");
                None
            }
        }
    }
}
