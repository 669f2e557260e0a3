//! In-memory cache backend.
//!
//! # Purpose
//! Implements `CacheStore` entirely in process using a `HashMap` guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - single-node deployments where a shared cache buys nothing
//!
//! # Expiry
//! Expiry instants are computed once on write so reads only compare
//! `Instant`s. Expired entries are evicted lazily on the read path; there is
//! no background sweeper.
use crate::{CacheResult, CacheStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local TTL cache.
///
/// State is lost on restart, which is fine: every cached value can be
/// recomputed from the store, and the TTL bounds staleness anyway.
#[derive(Debug, Default)]
pub struct MemoryCache {
    // RwLock allows concurrent readers while updates take exclusive access.
    inner: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Take a write lock so expired entries can be evicted in place.
        let mut guard = self.inner.write().await;
        if let Some(entry) = guard.get(key) {
            if Instant::now() >= entry.expires_at {
                // Lazy-expire on read to avoid a background sweeper.
                guard.remove(key);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.inner.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<()> {
        self.inner
            .write()
            .await
            .retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_roundtrip_and_overwrite() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v1", Duration::from_secs(60))
            .await
            .expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some("v1".to_string()));

        cache
            .set("k", "v2", Duration::from_secs(60))
            .await
            .expect("overwrite");
        assert_eq!(cache.get("k").await.expect("get"), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nope").await.expect("get"), None);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v", Duration::from_millis(10))
            .await
            .expect("set");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.expect("get"), None);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v", Duration::from_secs(60))
            .await
            .expect("set");
        cache.delete("k").await.expect("delete");
        assert_eq!(cache.get("k").await.expect("get"), None);
    }

    #[tokio::test]
    async fn delete_prefix_removes_only_matching_keys() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("recipes:all:a", "1", ttl).await.expect("set");
        cache.set("recipes:all:b", "2", ttl).await.expect("set");
        cache.set("recipes:id:42", "3", ttl).await.expect("set");

        cache.delete_prefix("recipes:all:").await.expect("prefix");

        assert_eq!(cache.get("recipes:all:a").await.expect("get"), None);
        assert_eq!(cache.get("recipes:all:b").await.expect("get"), None);
        assert_eq!(
            cache.get("recipes:id:42").await.expect("get"),
            Some("3".to_string())
        );
    }
}
