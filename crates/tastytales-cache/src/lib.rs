//! Keyed TTL cache used on the recipe read path.
//!
//! # Purpose
//! Exposes a small key-value contract (`get`/`set`/`delete` plus prefix
//! invalidation) with two backends: an in-process map for tests and
//! single-node deployments, and Redis for anything shared.
//!
//! # Notes
//! The cache is an optimization, never a source of truth. Callers are
//! expected to treat every error as a miss; expiry, eviction, and explicit
//! deletion are indistinguishable from the outside.
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod keys;
pub mod memory;
pub mod redis;

pub use memory::MemoryCache;
pub use redis::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache with per-entry expiry.
///
/// Absence of a value (miss, expiry, or explicit deletion) is always
/// reported as `Ok(None)`; `Err` means the backend itself misbehaved.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// Used to invalidate a whole key family (e.g. every cached filter
    /// combination of a listing) after a write.
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<()>;

    fn backend_name(&self) -> &'static str;
}
