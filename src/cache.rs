//! Cache collaborator contract and the in-process implementations.
//!
//! Expiry instants are computed by the boundary evaluator, not here: a cache
//! only stores them and refuses to return entries whose expiry has passed.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::TARGET_CACHE;

/// Keyed by request fingerprint. An expired entry must behave as absent;
/// implementations may reclaim it on read. `put` unconditionally overwrites,
/// so concurrent identical requests race benignly (last writer wins).
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, fingerprint: &str) -> Result<Option<String>>;

    async fn put(&self, fingerprint: &str, expires: DateTime<Utc>, content: &str) -> Result<()>;
}

#[async_trait]
impl<T: Cache + ?Sized> Cache for std::sync::Arc<T> {
    async fn get(&self, fingerprint: &str) -> Result<Option<String>> {
        (**self).get(fingerprint).await
    }

    async fn put(&self, fingerprint: &str, expires: DateTime<Utc>, content: &str) -> Result<()> {
        (**self).put(fingerprint, expires, content).await
    }
}

/// A cache that never stores anything; every lookup is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonCache;

#[async_trait]
impl Cache for NonCache {
    async fn get(&self, _fingerprint: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn put(&self, _fingerprint: &str, _expires: DateTime<Utc>, _content: &str) -> Result<()> {
        Ok(())
    }
}

struct MemoryEntry {
    expires: DateTime<Utc>,
    content: String,
}

/// In-process cache, suitable for a single long-lived service instance.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored expiry for a fingerprint, regardless of whether it has
    /// passed.
    pub fn expiry(&self, fingerprint: &str) -> Option<DateTime<Utc>> {
        self.entries.get(fingerprint).map(|entry| entry.expires)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, fingerprint: &str) -> Result<Option<String>> {
        let expired = match self.entries.get(fingerprint) {
            Some(entry) => {
                if entry.expires > Utc::now() {
                    debug!(target: TARGET_CACHE, "cache hit for {}", fingerprint);
                    return Ok(Some(entry.content.clone()));
                }
                true
            }
            None => false,
        };

        if expired {
            debug!(target: TARGET_CACHE, "reclaiming expired entry for {}", fingerprint);
            self.entries.remove(fingerprint);
        }

        Ok(None)
    }

    async fn put(&self, fingerprint: &str, expires: DateTime<Utc>, content: &str) -> Result<()> {
        debug!(target: TARGET_CACHE, "caching {} until {}", fingerprint, expires);
        self.entries.insert(
            fingerprint.to_string(),
            MemoryEntry {
                expires,
                content: content.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn non_cache_always_misses() {
        let cache = NonCache;
        cache
            .put("abc", Utc::now() + Duration::hours(1), "content")
            .await
            .unwrap();
        assert_eq!(cache.get("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_cache_returns_unexpired_entries() {
        let cache = MemoryCache::new();
        cache
            .put("abc", Utc::now() + Duration::hours(1), "content")
            .await
            .unwrap();

        assert_eq!(cache.get("abc").await.unwrap().as_deref(), Some("content"));
    }

    #[tokio::test]
    async fn memory_cache_treats_expired_entries_as_absent() {
        let cache = MemoryCache::new();
        cache
            .put("abc", Utc::now() - Duration::seconds(1), "stale")
            .await
            .unwrap();

        assert_eq!(cache.get("abc").await.unwrap(), None);
        // Reclaimed on read.
        assert!(cache.expiry("abc").is_none());
    }

    #[tokio::test]
    async fn memory_cache_overwrites_on_put() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::hours(1);
        cache.put("abc", expires, "old").await.unwrap();
        cache.put("abc", expires, "new").await.unwrap();

        assert_eq!(cache.get("abc").await.unwrap().as_deref(), Some("new"));
    }
}
