//! Static identity of each cacheable resource.

use std::fmt;
use std::marker::PhantomData;

use crate::config::JSON_PATH;
use crate::models::{FormatDefinition, Opening, SuggestionsResponse, WarmUp};

/// Where a resource lives remotely, where it is cached, and which bundled
/// asset backs it. `T` is the type the payload decodes into.
///
/// `cache_key` doubles as a file name in the cache namespace, so it must be
/// unique per resource kind and stable across releases.
pub struct ResourceDescriptor<T> {
    remote_url: String,
    cache_key: String,
    default_key: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> ResourceDescriptor<T> {
    pub fn new(
        remote_url: impl Into<String>,
        cache_key: impl Into<String>,
        default_key: impl Into<String>,
    ) -> Self {
        Self {
            remote_url: remote_url.into(),
            cache_key: cache_key.into(),
            default_key: default_key.into(),
            _payload: PhantomData,
        }
    }

    /// Descriptor for `{base_url}/json/{name}.json`, cached as `{name}.json`
    /// and backed by the bundled `{name}` asset. The base URL may or may not
    /// end in a slash.
    fn json(base_url: &str, name: &str) -> Self {
        Self::new(
            format!("{}/{}{}.json", base_url.trim_end_matches('/'), JSON_PATH, name),
            format!("{}.json", name),
            name,
        )
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }
}

impl<T> Clone for ResourceDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            remote_url: self.remote_url.clone(),
            cache_key: self.cache_key.clone(),
            default_key: self.default_key.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("remote_url", &self.remote_url)
            .field("cache_key", &self.cache_key)
            .field("default_key", &self.default_key)
            .finish()
    }
}

impl ResourceDescriptor<Vec<FormatDefinition>> {
    pub fn formats(base_url: &str) -> Self {
        Self::json(base_url, "formats")
    }
}

impl ResourceDescriptor<Vec<Opening>> {
    pub fn openings(base_url: &str) -> Self {
        Self::json(base_url, "openings")
    }
}

impl ResourceDescriptor<Vec<WarmUp>> {
    pub fn warm_ups(base_url: &str) -> Self {
        Self::json(base_url, "warmups")
    }
}

impl ResourceDescriptor<SuggestionsResponse> {
    pub fn suggestions(base_url: &str) -> Self {
        Self::json(base_url, "suggestions")
    }
}

/// Every known resource for one remote origin.
#[derive(Debug, Clone)]
pub struct Resources {
    pub formats: ResourceDescriptor<Vec<FormatDefinition>>,
    pub openings: ResourceDescriptor<Vec<Opening>>,
    pub warm_ups: ResourceDescriptor<Vec<WarmUp>>,
    pub suggestions: ResourceDescriptor<SuggestionsResponse>,
}

impl Resources {
    pub fn new(base_url: &str) -> Self {
        Self {
            formats: ResourceDescriptor::formats(base_url),
            openings: ResourceDescriptor::openings(base_url),
            warm_ups: ResourceDescriptor::warm_ups(base_url),
            suggestions: ResourceDescriptor::suggestions(base_url),
        }
    }

    pub fn cache_keys(&self) -> [&str; 4] {
        [
            self.formats.cache_key(),
            self.openings.cache_key(),
            self.warm_ups.cache_key(),
            self.suggestions.cache_key(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    #[test]
    fn test_formats_descriptor() {
        let descriptor = ResourceDescriptor::formats(DEFAULT_BASE_URL);
        assert!(descriptor.remote_url().starts_with(DEFAULT_BASE_URL));
        assert!(descriptor.remote_url().ends_with("json/formats.json"));
        assert_eq!(descriptor.cache_key(), "formats.json");
        assert_eq!(descriptor.default_key(), "formats");
    }

    #[test]
    fn test_warm_ups_descriptor() {
        let descriptor = ResourceDescriptor::warm_ups("https://example.com/");
        assert_eq!(descriptor.remote_url(), "https://example.com/json/warmups.json");
        assert_eq!(descriptor.cache_key(), "warmups.json");
        assert_eq!(descriptor.default_key(), "warmups");
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let resources = Resources::new("https://example.com");
        assert_eq!(
            resources.warm_ups.remote_url(),
            "https://example.com/json/warmups.json"
        );
        assert_eq!(
            ResourceDescriptor::formats("https://example.com//").remote_url(),
            "https://example.com/json/formats.json"
        );
    }

    #[test]
    fn test_cache_keys_are_unique() {
        let resources = Resources::new(DEFAULT_BASE_URL);
        let keys: HashSet<&str> = resources.cache_keys().into_iter().collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_descriptor_is_send_sync_for_any_payload() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResourceDescriptor<std::rc::Rc<u8>>>();
    }
}
