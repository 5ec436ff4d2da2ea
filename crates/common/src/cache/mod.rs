//! Generic thread-safe cache with TTL expiration
//!
//! Backs the in-process cache adapter. Entries expire on a per-cache default
//! TTL or a per-entry override, and an optional LRU bound caps memory.
//!
//! # Features
//!
//! - **Thread-safe**: `Arc<RwLock<_>>` storage, shareable across tasks
//! - **Per-entry TTL**: each insert may override the cache-wide default
//! - **Bounded**: optional max size with least-recently-used eviction
//! - **Metrics**: optional hit/miss/eviction statistics
//! - **Testable**: clock abstraction for deterministic expiry tests
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use melodex_common::cache::{Cache, CacheConfig};
//!
//! let cache: Cache<String, Vec<u8>> = Cache::new(CacheConfig::ttl(Duration::from_secs(3600)));
//! cache.insert_with_ttl("profile:token".to_string(), vec![1, 2, 3], Duration::from_secs(1800));
//! assert_eq!(cache.get(&"profile:token".to_string()), Some(vec![1, 2, 3]));
//! ```

mod config;
mod core;
mod stats;

pub use config::{CacheConfig, EvictionPolicy};
pub use core::Cache;
pub use stats::CacheStats;
