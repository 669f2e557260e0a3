//! Redis cache backend.
//!
//! # Purpose
//! Backs `CacheStore` with Redis via a `ConnectionManager`, which reconnects
//! on its own and can be cloned cheaply per operation.
//!
//! # Notes
//! Values are written with `SET` followed by `EXPIRE` so a zero TTL degrades
//! to a plain unexpiring write instead of an error. Prefix invalidation uses
//! an explicit `SCAN` cursor loop; `KEYS` would block the server.
use crate::{CacheError, CacheResult, CacheStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to the Redis instance at `url`.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = Client::open(url).map_err(backend)?;
        let conn = client.get_connection_manager().await.map_err(backend)?;
        Ok(Self { conn })
    }
}

fn backend(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(backend)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let () = conn.set(key, value).await.map_err(backend)?;
        let secs = ttl.as_secs();
        if secs > 0 {
            let () = conn.expire(key, secs as i64).await.map_err(backend)?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let () = conn.del(key).await.map_err(backend)?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut keys: Vec<String> = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(backend)?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        if !keys.is_empty() {
            let () = conn.del(keys).await.map_err(backend)?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
