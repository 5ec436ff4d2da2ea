//! In-process cache store

use std::time::Duration;

use async_trait::async_trait;
use melodex_common::cache::{Cache, CacheConfig};
use melodex_core::CacheStore;

/// Upper bound on retained entries; least recently used beyond this
const DEFAULT_MAX_ENTRIES: usize = 4096;

/// `CacheStore` backed by the in-process TTL cache
///
/// Suitable for a single instance only: entries are invisible to other
/// processes. Never fails, so the fail-open contract is trivially met.
pub struct MemoryCacheStore {
    inner: Cache<String, Vec<u8>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Cache::new(CacheConfig::lru(DEFAULT_MAX_ENTRIES)) }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.get(&key.to_string())
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.inner.insert_with_ttl(key.to_string(), value, ttl);
    }

    async fn delete(&self, key: &str) {
        self.inner.remove(&key.to_string());
    }
}
