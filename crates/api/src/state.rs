//! Application state
//!
//! One `AppState` per process, cloned into every handler. Session and cache
//! state are explicit dependencies injected here rather than ambient
//! globals, which keeps handlers testable against mock adapters.

use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use melodex_common::auth::OAuthClient;
use melodex_core::ports::{
    AnalyticsRepository, FriendRepository, MusicApi, RecommendationEngine, UserRepository,
};
use melodex_core::{CacheStore, SessionGuard, SessionStore};
use melodex_domain::Result;
use melodex_infra::repositories::{
    InMemoryAnalyticsRepository, InMemoryFriendRepository, InMemoryUserRepository,
    NoopRecommendationEngine,
};
use melodex_infra::{MemoryCacheStore, RedisCacheStore, SpotifyClient};
use tracing::info;

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub guard: SessionGuard<OAuthClient>,
    pub oauth: Arc<OAuthClient>,
    pub cache: Arc<dyn CacheStore>,
    pub music: Arc<dyn MusicApi>,
    pub users: Arc<dyn UserRepository>,
    pub friends: Arc<dyn FriendRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub recommendations: Arc<dyn RecommendationEngine>,
    cookie_key: Key,
}

impl AppState {
    /// Build state with the default adapters for this deployment
    ///
    /// The cache store is Redis when an address is configured (required for
    /// multi-instance correctness) and in-process memory otherwise.
    ///
    /// # Errors
    /// Returns `Config` if the cache store address is malformed.
    pub fn new(config: AppConfig) -> Result<Self> {
        let cache: Arc<dyn CacheStore> = match &config.redis_url {
            Some(url) => {
                info!("using shared cache store");
                Arc::new(RedisCacheStore::new(url)?)
            }
            None => {
                info!("no cache store address configured; using in-process cache");
                Arc::new(MemoryCacheStore::new())
            }
        };

        let music: Arc<dyn MusicApi> = match &config.api_base_url {
            Some(base) => Arc::new(SpotifyClient::with_base_url(base.clone())),
            None => Arc::new(SpotifyClient::new()),
        };

        let users = Arc::new(InMemoryUserRepository::new());
        let friends = Arc::new(InMemoryFriendRepository::new(Arc::clone(&users)));

        Self::with_adapters(
            config,
            cache,
            music,
            users,
            friends,
            Arc::new(InMemoryAnalyticsRepository::new()),
            Arc::new(NoopRecommendationEngine::new()),
        )
    }

    /// Build state with explicit adapters (tests inject mocks here)
    ///
    /// # Errors
    /// Currently infallible; kept fallible to match `new`.
    #[allow(clippy::unnecessary_wraps)]
    pub fn with_adapters(
        config: AppConfig,
        cache: Arc<dyn CacheStore>,
        music: Arc<dyn MusicApi>,
        users: Arc<dyn UserRepository>,
        friends: Arc<dyn FriendRepository>,
        analytics: Arc<dyn AnalyticsRepository>,
        recommendations: Arc<dyn RecommendationEngine>,
    ) -> Result<Self> {
        let oauth = Arc::new(OAuthClient::new(config.oauth_config()));
        let cookie_key = Key::derive_from(config.cookie_key.as_bytes());

        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
            guard: SessionGuard::new(Arc::clone(&oauth)),
            oauth,
            cache,
            music,
            users,
            friends,
            analytics,
            recommendations,
            cookie_key,
        })
    }
}

/// Lets `SignedCookieJar` extract its signing key from the state
impl axum::extract::FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
