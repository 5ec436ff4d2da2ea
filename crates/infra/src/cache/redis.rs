//! Redis-backed cache store
//!
//! The deployment default when instances share state behind a load
//! balancer. Every operation degrades gracefully: connection or command
//! failures are logged at warn level and reported to the caller as a miss
//! or a no-op, per the fail-open contract.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use melodex_core::CacheStore;
use melodex_domain::{MelodexError, Result};
use redis::AsyncCommands;
use tracing::warn;

/// `CacheStore` backed by a shared Redis instance
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    /// Create a store from a Redis connection URL
    ///
    /// Connections are established lazily; an unreachable server surfaces
    /// as cache misses at request time, not as a startup failure.
    ///
    /// # Errors
    /// Returns `Config` if the URL itself is malformed.
    pub fn new(redis_url: &str) -> Result<Self> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| MelodexError::Config(format!("invalid cache store address: {e}")))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "cache store unreachable; treating as miss");
                return None;
            }
        };

        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "cache GET failed; treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "cache store unreachable; dropping write");
                return;
            }
        };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await {
            warn!(key = %key, error = %e, "cache SET failed; dropping write");
        }
    }

    async fn delete(&self, key: &str) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "cache store unreachable; skipping delete");
                return;
            }
        };

        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!(key = %key, error = %e, "cache DEL failed");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::redis.
    use super::*;

    /// Validates URL validation at construction.
    ///
    /// Assertions:
    /// - Confirms a malformed URL is a `Config` error.
    /// - Confirms a well-formed URL constructs (no connection is made).
    #[test]
    fn test_redis_store_url_validation() {
        assert!(matches!(
            RedisCacheStore::new("not a url"),
            Err(MelodexError::Config(_))
        ));
        assert!(RedisCacheStore::new("redis://localhost:6379").is_ok());
    }

    /// Validates fail-open behavior with no server listening.
    ///
    /// Assertions:
    /// - Confirms `get` answers `None` and `set`/`delete` return without
    ///   error when the backing store is unreachable.
    #[tokio::test]
    async fn test_redis_store_fail_open_when_unreachable() {
        // Reserved port with nothing listening
        let store = RedisCacheStore::new("redis://127.0.0.1:1").unwrap();

        store.set("profile:tok", vec![1], Duration::from_secs(60)).await;
        assert_eq!(store.get("profile:tok").await, None);
        store.delete("profile:tok").await;
    }
}
