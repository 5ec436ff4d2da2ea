//! Core cache implementation
//!
//! Generic thread-safe cache with per-entry TTL expiration and optional LRU
//! eviction when a size bound is configured.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use super::config::{CacheConfig, EvictionPolicy};
use super::stats::{CacheStats, MetricsCollector};
use crate::clock::{Clock, SystemClock};

/// Entry stored in the cache with expiry and access metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    /// Per-entry TTL override; falls back to the cache-wide default
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant, default_ttl: Option<Duration>) -> bool {
        match self.ttl.or(default_ttl) {
            Some(ttl) => now.duration_since(self.inserted_at) >= ttl,
            None => false,
        }
    }
}

/// Internal storage for cache entries
#[derive(Debug)]
struct CacheStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    entries: HashMap<K, CacheEntry<V>>,
    /// Tracks order for LRU eviction (front = least recently used)
    access_order: Vec<K>,
}

impl<K, V> CacheStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self { entries: HashMap::new(), access_order: Vec::new() }
    }
}

/// Generic thread-safe cache with TTL expiration
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone`)
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for expiry checks (defaults to [`SystemClock`])
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use melodex_common::cache::{Cache, CacheConfig};
///
/// let cache: Cache<String, i32> = Cache::new(CacheConfig::ttl(Duration::from_secs(60)));
/// cache.insert("key".to_string(), 42);
/// assert_eq!(cache.get(&"key".to_string()), Some(42));
/// ```
pub struct Cache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    storage: Arc<RwLock<CacheStorage<K, V>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> Cache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache with the given configuration using the system clock
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            storage: Arc::new(RwLock::new(CacheStorage::new())),
            config,
            metrics: MetricsCollector::new(),
            clock,
        }
    }

    fn write_storage(&self) -> RwLockWriteGuard<'_, CacheStorage<K, V>> {
        match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn read_storage(&self) -> RwLockReadGuard<'_, CacheStorage<K, V>> {
        match self.storage.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Insert a value using the cache-wide default TTL
    pub fn insert(&self, key: K, value: V) {
        self.insert_entry(key, value, None);
    }

    /// Insert a value with a per-entry TTL override
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.insert_entry(key, value, Some(ttl));
    }

    fn insert_entry(&self, key: K, value: V, ttl: Option<Duration>) {
        let mut storage = self.write_storage();

        if let Some(max_size) = self.config.max_size {
            if storage.entries.len() >= max_size && !storage.entries.contains_key(&key) {
                self.evict_one(&mut storage);
            }
        }

        let entry = CacheEntry { value, inserted_at: self.clock.now(), ttl };
        storage.entries.insert(key.clone(), entry);

        if self.config.eviction_policy == EvictionPolicy::Lru {
            storage.access_order.retain(|k| k != &key);
            storage.access_order.push(key);
        }

        if self.config.track_metrics {
            self.metrics.record_insert();
        }
    }

    /// Get a value from the cache
    ///
    /// Returns `None` if the key doesn't exist or the entry has expired.
    /// Expired entries are removed eagerly.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut storage = self.write_storage();
        let now = self.clock.now();

        let expired = match storage.entries.get(key) {
            Some(entry) => entry.is_expired(now, self.config.default_ttl),
            None => {
                if self.config.track_metrics {
                    self.metrics.record_miss();
                }
                return None;
            }
        };

        if expired {
            storage.entries.remove(key);
            storage.access_order.retain(|k| k != key);
            if self.config.track_metrics {
                self.metrics.record_miss();
                self.metrics.record_expiration();
            }
            return None;
        }

        let value = storage.entries.get(key).map(|entry| entry.value.clone());

        if value.is_some() && self.config.eviction_policy == EvictionPolicy::Lru {
            storage.access_order.retain(|k| k != key);
            storage.access_order.push(key.clone());
        }

        if self.config.track_metrics {
            if value.is_some() {
                self.metrics.record_hit();
            } else {
                self.metrics.record_miss();
            }
        }

        value
    }

    /// Remove a value from the cache, returning it if present
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut storage = self.write_storage();
        storage.access_order.retain(|k| k != key);
        storage.entries.remove(key).map(|e| e.value)
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        let mut storage = self.write_storage();
        storage.entries.clear();
        storage.access_order.clear();

        if self.config.track_metrics {
            self.metrics.reset();
        }
    }

    /// Get the current number of entries (including not-yet-reaped expired
    /// ones)
    pub fn len(&self) -> usize {
        self.read_storage().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries, returning the number removed
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut storage = self.write_storage();

        let expired_keys: Vec<K> = storage
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.config.default_ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            storage.entries.remove(key);
            storage.access_order.retain(|k| k != key);
            if self.config.track_metrics {
                self.metrics.record_expiration();
            }
        }

        expired_keys.len()
    }

    /// Get a statistics snapshot
    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        self.metrics.snapshot(size, self.config.max_size)
    }

    fn evict_one(&self, storage: &mut CacheStorage<K, V>) {
        if self.config.eviction_policy != EvictionPolicy::Lru {
            return;
        }
        if storage.access_order.is_empty() {
            return;
        }
        let victim = storage.access_order.remove(0);
        storage.entries.remove(&victim);
        if self.config.track_metrics {
            self.metrics.record_eviction();
        }
    }
}
