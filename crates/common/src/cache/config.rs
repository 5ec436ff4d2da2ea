//! Cache configuration types

use std::time::Duration;

/// Eviction policy for cache entries when capacity is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Least Recently Used - evicts the least recently accessed entry
    #[default]
    Lru,
    /// No automatic eviction (TTL expiry and manual removal only)
    None,
}

/// Configuration for cache behavior
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (None = unlimited)
    pub max_size: Option<usize>,

    /// Default time-to-live for entries without a per-entry override
    /// (None = no expiration)
    pub default_ttl: Option<Duration>,

    /// Eviction policy when max_size is reached
    pub eviction_policy: EvictionPolicy,

    /// Whether to collect access metrics
    pub track_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: None,
            default_ttl: None,
            eviction_policy: EvictionPolicy::Lru,
            track_metrics: false,
        }
    }
}

impl CacheConfig {
    /// Preset for a TTL-only cache (no size bound)
    #[must_use]
    pub fn ttl(duration: Duration) -> Self {
        Self {
            max_size: None,
            default_ttl: Some(duration),
            eviction_policy: EvictionPolicy::None,
            track_metrics: false,
        }
    }

    /// Preset for a size-bounded LRU cache
    #[must_use]
    pub fn lru(max_size: usize) -> Self {
        Self {
            max_size: Some(max_size),
            default_ttl: None,
            eviction_policy: EvictionPolicy::Lru,
            track_metrics: false,
        }
    }

    /// Combined TTL + LRU cache
    #[must_use]
    pub fn ttl_lru(ttl: Duration, max_size: usize) -> Self {
        Self {
            max_size: Some(max_size),
            default_ttl: Some(ttl),
            eviction_policy: EvictionPolicy::Lru,
            track_metrics: false,
        }
    }

    /// Enable metrics collection
    #[must_use]
    pub fn with_metrics(mut self) -> Self {
        self.track_metrics = true;
        self
    }
}
