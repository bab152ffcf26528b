use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::CacheMetadata;
use crate::error::{RemoteConfigError, Result};

/// Suffix appended to a cache key to name its metadata file.
const METADATA_SUFFIX: &str = ".metadata";

/// Distinguishes temp files of concurrent writers within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Raw payload and metadata persistence for one cache namespace.
///
/// The namespace directory is created on first write, so constructing a
/// store never touches the filesystem.
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_dir: PathBuf,
}

impl CacheStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn payload_path(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.cache_dir.join(key))
    }

    fn metadata_path(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.cache_dir.join(format!("{}{}", key, METADATA_SUFFIX)))
    }

    /// Keys are file names inside the namespace; anything that could escape
    /// it or collide with a metadata file is refused.
    fn validate_key(key: &str) -> Result<()> {
        let invalid = key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.starts_with('.')
            || key.ends_with(METADATA_SUFFIX);
        if invalid {
            return Err(RemoteConfigError::io(
                key,
                std::io::Error::new(ErrorKind::InvalidInput, "invalid cache key"),
            ));
        }
        Ok(())
    }

    /// Read a file, mapping "not found" to `None`.
    fn read_file(path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RemoteConfigError::io(path, e)),
        }
    }

    /// Write to a temp file in the same directory, then rename over the
    /// target so readers see either the old or the new contents.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir)
            .map_err(|e| RemoteConfigError::io(&self.cache_dir, e))?;

        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("cache");
        let tmp = self.cache_dir.join(format!(
            ".{}.tmp.{}.{}",
            file_name,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let result = (|| -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            std::fs::rename(&tmp, path)
        })();

        if let Err(e) = result {
            let _ = std::fs::remove_file(&tmp);
            return Err(RemoteConfigError::io(path, e));
        }
        Ok(())
    }

    fn remove_file(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RemoteConfigError::io(path, e)),
        }
    }

    // ===== Payload =====

    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Self::read_file(&self.payload_path(key)?)
    }

    pub fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.payload_path(key)?;
        self.write_atomic(&path, bytes)?;
        debug!(key, bytes = bytes.len(), "Cached payload");
        Ok(())
    }

    // ===== Metadata =====

    /// A metadata file that exists but cannot be parsed is reported as a
    /// decode failure; the loader treats that the same as no metadata.
    pub fn read_metadata(&self, key: &str) -> Result<Option<CacheMetadata>> {
        match Self::read_file(&self.metadata_path(key)?)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| RemoteConfigError::decode(key, e)),
            None => Ok(None),
        }
    }

    pub fn write_metadata(&self, metadata: &CacheMetadata) -> Result<()> {
        let path = self.metadata_path(&metadata.cache_key)?;
        let bytes = serde_json::to_vec(metadata)
            .map_err(|e| RemoteConfigError::decode(&metadata.cache_key, e))?;
        self.write_atomic(&path, &bytes)
    }

    // ===== Removal =====

    /// Remove payload and metadata for one key. Missing files are not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        Self::remove_file(&self.payload_path(key)?)?;
        Self::remove_file(&self.metadata_path(key)?)?;
        debug!(key, "Deleted cache entry");
        Ok(())
    }

    /// Remove the whole namespace and recreate it empty.
    pub fn delete_all(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.cache_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(RemoteConfigError::io(&self.cache_dir, e)),
        }
        std::fs::create_dir_all(&self.cache_dir)
            .map_err(|e| RemoteConfigError::io(&self.cache_dir, e))?;
        debug!(cache_dir = %self.cache_dir.display(), "Cleared cache namespace");
        Ok(())
    }
}
