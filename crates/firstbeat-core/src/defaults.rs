//! Fallback payloads packaged with the application.
//!
//! The bundled assets are compiled into the binary, so in a correctly built
//! application they are always present. A missing or undecodable asset is a
//! packaging defect; it is reported as an error, never a panic.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::{RemoteConfigError, Result};
use crate::resource::ResourceDescriptor;

const FORMATS_JSON: &[u8] = include_bytes!("../assets/formats.json");
const OPENINGS_JSON: &[u8] = include_bytes!("../assets/openings.json");
const WARMUPS_JSON: &[u8] = include_bytes!("../assets/warmups.json");
const SUGGESTIONS_JSON: &[u8] = include_bytes!("../assets/suggestions.json");

#[derive(Debug, Clone, Default)]
pub struct LocalDefaults {
    assets: HashMap<String, Cow<'static, [u8]>>,
}

impl LocalDefaults {
    /// No assets at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The assets shipped with this crate, keyed by default key.
    pub fn bundled() -> Self {
        Self::empty()
            .with_asset("formats", FORMATS_JSON)
            .with_asset("openings", OPENINGS_JSON)
            .with_asset("warmups", WARMUPS_JSON)
            .with_asset("suggestions", SUGGESTIONS_JSON)
    }

    pub fn with_asset(mut self, key: &str, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.assets.insert(key.to_string(), bytes.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.assets.contains_key(key)
    }

    pub fn load<T: DeserializeOwned>(&self, descriptor: &ResourceDescriptor<T>) -> Result<T> {
        let key = descriptor.default_key();
        let bytes = self.assets.get(key).ok_or_else(|| {
            RemoteConfigError::io(
                format!("{}.json", key),
                std::io::Error::new(std::io::ErrorKind::NotFound, "bundled asset not packaged"),
            )
        })?;
        serde_json::from_slice(bytes).map_err(|e| RemoteConfigError::decode(key, e))
    }
}
