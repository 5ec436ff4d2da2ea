//! Server-side session storage
//!
//! Sessions live in process memory keyed by an opaque UUID; the cookie only
//! ever carries the id. Each entry wraps its token state in an async
//! `RwLock` so the guard can mutate it in place, plus a dedicated mutex
//! that serializes refresh attempts for that session.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use melodex_common::auth::TokenResponse;
use melodex_domain::constants::TOKEN_EXPIRY_MARGIN_SECS;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Bearer credentials held by a session
#[derive(Debug, Clone)]
pub struct TokenState {
    /// Bearer credential for upstream API calls. Opaque.
    pub access_token: String,

    /// Long-lived credential used solely by the refresh grant
    pub refresh_token: String,

    /// Absolute expiry of `access_token`: issue time plus the
    /// provider-declared lifetime minus the safety margin
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Build token state from a provider token response
    ///
    /// `fallback_refresh_token` covers refresh-grant responses, which may
    /// omit the refresh token; the session keeps using the one it holds.
    #[must_use]
    pub fn from_response(response: &TokenResponse, fallback_refresh_token: &str) -> Self {
        let refresh_token = response
            .refresh_token
            .clone()
            .unwrap_or_else(|| fallback_refresh_token.to_string());

        Self {
            access_token: response.access_token.clone(),
            refresh_token,
            expires_at: expires_at_from_lifetime(response.expires_in),
        }
    }

    /// Whether the access token is past its (margin-adjusted) expiry
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Absolute expiry for a relative provider lifetime, safety margin applied
#[must_use]
pub(crate) fn expires_at_from_lifetime(expires_in_secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(expires_in_secs - TOKEN_EXPIRY_MARGIN_SECS)
}

/// One session's server-side state
///
/// `tokens` is `None` once the session has been destroyed (logout or
/// unrecoverable refresh failure); the entry itself may briefly outlive
/// destruction while requests still hold it.
#[derive(Debug)]
pub struct SessionEntry {
    tokens: RwLock<Option<TokenState>>,
    /// Serializes the refresh grant per session (single-flight)
    refresh_gate: Mutex<()>,
}

impl SessionEntry {
    /// Create an entry holding freshly issued tokens
    #[must_use]
    pub fn new(tokens: TokenState) -> Self {
        Self { tokens: RwLock::new(Some(tokens)), refresh_gate: Mutex::new(()) }
    }

    /// Clone the current token state, if the session is still alive
    pub async fn snapshot(&self) -> Option<TokenState> {
        self.tokens.read().await.clone()
    }

    /// Replace the token state in place (refresh path)
    pub async fn replace(&self, tokens: TokenState) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Destroy the session's credentials
    pub async fn destroy(&self) {
        *self.tokens.write().await = None;
    }

    /// Whether the session still holds credentials
    pub async fn is_alive(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    pub(crate) fn tokens(&self) -> &RwLock<Option<TokenState>> {
        &self.tokens
    }

    pub(crate) fn refresh_gate(&self) -> &Mutex<()> {
        &self.refresh_gate
    }
}

/// Process-wide session registry
///
/// Entries are shared (`Arc`) so a request can keep using a session it
/// resolved even while another request logs it out.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<SessionEntry>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: DashMap::new() }
    }

    /// Create a session for freshly issued tokens, returning its opaque id
    pub fn create(&self, tokens: TokenState) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), Arc::new(SessionEntry::new(tokens)));
        debug!(session_id = %id, "session created");
        id
    }

    /// Resolve a session by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<SessionEntry>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a session, destroying its credentials
    pub async fn remove(&self, id: &str) {
        if let Some((_, entry)) = self.sessions.remove(id) {
            entry.destroy().await;
            debug!(session_id = %id, "session removed");
        }
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
