//! Read-through cache coordination
//!
//! Expensive upstream aggregations are memoized behind keys derived from the
//! current access token. Because tokens are unique per login, the token
//! doubles as a session discriminant, and a token rotation after refresh
//! implicitly invalidates every previously cached entry (new token, new key,
//! guaranteed miss). Logout performs the explicit counterpart: it deletes
//! the outgoing token's entries across the fixed set of resource tags.
//!
//! The cache is a pure optimization. Every aggregation it fronts is
//! idempotent and re-derivable, so the [`CacheStore`] contract is fail-open:
//! an unreachable backing store degrades to "always recompute", never to an
//! error.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use melodex_domain::constants::{DASHBOARD_CACHE_TTL_SECS, PROFILE_CACHE_TTL_SECS};
use melodex_domain::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Key-value store with per-entry TTL fronting upstream aggregations
///
/// The signatures are infallible on purpose: implementations log and
/// swallow backing-store failures. `get` answers `None` both for a genuine
/// miss and for an unreachable store, and `set`/`delete` are best-effort.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a stored value if present and unexpired
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value with the given time-to-live
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Remove an entry if present
    async fn delete(&self, key: &str);
}

/// Logical resource kinds the cache fronts
///
/// The set is fixed and enumerable; logout iterates it rather than
/// discovering keys dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTag {
    /// Profile snapshot from the provider's `/me` endpoint
    Profile,
    /// Aggregated dashboard analytics
    Dashboard,
}

impl ResourceTag {
    /// Every resource tag the cache namespace can hold
    pub const ALL: [Self; 2] = [Self::Profile, Self::Dashboard];

    /// Namespace prefix used in cache keys
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Dashboard => "dashboard",
        }
    }

    /// Freshness window for this resource kind
    ///
    /// A product decision per resource, deliberately independent of token
    /// expiry.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        match self {
            Self::Profile => Duration::from_secs(PROFILE_CACHE_TTL_SECS),
            Self::Dashboard => Duration::from_secs(DASHBOARD_CACHE_TTL_SECS),
        }
    }

    /// Cache key for this resource under the given access token
    #[must_use]
    pub fn cache_key(&self, access_token: &str) -> String {
        format!("{}:{}", self.as_str(), access_token)
    }
}

impl std::fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-through memo around an expensive upstream aggregation
///
/// Checks the cache under `tag:access_token`; on a miss, runs `compute`,
/// stores the result with the given TTL, and returns it. A failing
/// `compute` propagates uncached; a failing store write still returns the
/// computed value.
///
/// # Errors
/// Only `compute`'s error. Cache unavailability is not an error.
pub async fn fetch_with_cache<T, F, Fut>(
    cache: &dyn CacheStore,
    tag: ResourceTag,
    access_token: &str,
    ttl: Duration,
    compute: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let key = tag.cache_key(access_token);

    if let Some(bytes) = cache.get(&key).await {
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(%tag, "serving cached value");
                return Ok(value);
            }
            Err(e) => {
                // Undecodable entries (e.g. a payload shape change across
                // deploys) count as misses and are evicted.
                warn!(%tag, error = %e, "discarding undecodable cache entry");
                cache.delete(&key).await;
            }
        }
    }

    let value = compute().await?;

    match serde_json::to_vec(&value) {
        Ok(bytes) => cache.set(&key, bytes, ttl).await,
        Err(e) => warn!(%tag, error = %e, "failed to serialize value for cache"),
    }

    Ok(value)
}

/// Delete every cache entry namespaced under the given access token
///
/// Invoked on logout before the session is destroyed. Has no failure mode
/// visible to the caller; store errors are swallowed by the [`CacheStore`]
/// contract.
pub async fn invalidate_session_entries(cache: &dyn CacheStore, access_token: &str) {
    for tag in ResourceTag::ALL {
        cache.delete(&tag.cache_key(access_token)).await;
    }
    debug!("cache entries invalidated for session");
}
