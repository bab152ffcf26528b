use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    #[serde(rename = "filename")]
    pub cache_key: String,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheMetadata {
    /// `None` when `cached_at + ttl` is past the representable date range.
    pub fn new(cache_key: &str, cached_at: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = cached_at.checked_add_signed(ttl)?;
        Some(Self {
            cache_key: cache_key.to_string(),
            cached_at,
            expires_at,
        })
    }

    /// A payload is valid strictly before `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> CacheStatus {
        if self.is_expired_at(now) {
            CacheStatus::Expired {
                cached_at: self.cached_at,
            }
        } else {
            CacheStatus::Valid {
                cached_at: self.cached_at,
                expires_at: self.expires_at,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    NotCached,
    Expired {
        cached_at: DateTime<Utc>,
    },
    Valid {
        cached_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
}

impl CacheStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, CacheStatus::Valid { .. })
    }
}
