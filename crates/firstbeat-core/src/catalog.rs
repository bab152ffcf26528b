//! Typed access to every content resource the app consumes.

use anyhow::Result;

use crate::cache::CacheStatus;
use crate::config::Config;
use crate::loader::{ConfigLoader, Provenance};
use crate::models::{FormatDefinition, Opening, SuggestionCategory, WarmUp};
use crate::resource::Resources;

/// Which tier answered for each resource during [`Catalog::preload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadReport {
    pub formats: Provenance,
    pub openings: Provenance,
    pub warm_ups: Provenance,
    pub suggestions: Provenance,
}

/// Consumer-facing view over a [`ConfigLoader`]. An unavailable resource is
/// an empty list.
#[derive(Clone)]
pub struct Catalog {
    loader: ConfigLoader,
    resources: Resources,
}

impl Catalog {
    pub fn new(loader: ConfigLoader, resources: Resources) -> Self {
        Self { loader, resources }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let loader = ConfigLoader::from_config(config)?;
        Ok(Self::new(loader, Resources::new(config.base_url())))
    }

    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub async fn formats(&self) -> Vec<FormatDefinition> {
        self.loader.load(&self.resources.formats).await.unwrap_or_default()
    }

    pub async fn openings(&self) -> Vec<Opening> {
        self.loader.load(&self.resources.openings).await.unwrap_or_default()
    }

    pub async fn warm_ups(&self) -> Vec<WarmUp> {
        self.loader.load(&self.resources.warm_ups).await.unwrap_or_default()
    }

    pub async fn suggestion_categories(&self) -> Vec<SuggestionCategory> {
        self.loader
            .load(&self.resources.suggestions)
            .await
            .map(|response| response.categories)
            .unwrap_or_default()
    }

    /// Load every resource concurrently, warming the cache.
    pub async fn preload(&self) -> PreloadReport {
        let (formats, openings, warm_ups, suggestions) = futures::join!(
            self.loader.load_with_source(&self.resources.formats),
            self.loader.load_with_source(&self.resources.openings),
            self.loader.load_with_source(&self.resources.warm_ups),
            self.loader.load_with_source(&self.resources.suggestions),
        );
        PreloadReport {
            formats: formats.provenance(),
            openings: openings.provenance(),
            warm_ups: warm_ups.provenance(),
            suggestions: suggestions.provenance(),
        }
    }

    pub fn cache_statuses(&self) -> Vec<(String, CacheStatus)> {
        vec![
            (
                self.resources.formats.cache_key().to_string(),
                self.loader.cache_status(&self.resources.formats),
            ),
            (
                self.resources.openings.cache_key().to_string(),
                self.loader.cache_status(&self.resources.openings),
            ),
            (
                self.resources.warm_ups.cache_key().to_string(),
                self.loader.cache_status(&self.resources.warm_ups),
            ),
            (
                self.resources.suggestions.cache_key().to_string(),
                self.loader.cache_status(&self.resources.suggestions),
            ),
        ]
    }

    pub async fn clear_all(&self) {
        self.loader.clear_all_cache().await;
    }
}
