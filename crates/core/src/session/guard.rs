//! Session guard
//!
//! Gate in front of every protected operation. Validates that the session
//! holds a usable access token, transparently renews an expired one through
//! the refresh grant, and short-circuits with an authentication error when
//! renewal is impossible.

use std::sync::Arc;

use melodex_common::auth::OAuthClientTrait;
use melodex_domain::{MelodexError, Result};
use tracing::{debug, info, warn};

use super::store::{SessionEntry, TokenState};

/// Session credentials validated for immediate upstream use
#[derive(Debug, Clone)]
pub struct ValidSession {
    /// Access token guaranteed unexpired at validation time
    pub access_token: String,
}

/// Gate function invoked before any protected operation
///
/// This is the only path that mutates a session's `access_token` and
/// `expires_at` outside of the initial login exchange.
#[derive(Debug)]
pub struct SessionGuard<C: OAuthClientTrait> {
    oauth: Arc<C>,
}

impl<C: OAuthClientTrait> Clone for SessionGuard<C> {
    fn clone(&self) -> Self {
        Self { oauth: Arc::clone(&self.oauth) }
    }
}

impl<C: OAuthClientTrait> SessionGuard<C> {
    /// Create a guard backed by the given OAuth client
    #[must_use]
    pub fn new(oauth: Arc<C>) -> Self {
        Self { oauth }
    }

    /// Validate the session, refreshing the access token if expired
    ///
    /// Call this immediately before every upstream use of the token, not
    /// only at request entry: a handler suspended across I/O can resume
    /// after the token's expiry.
    ///
    /// # Errors
    /// - [`MelodexError::Unauthenticated`] when the session holds no token
    /// - [`MelodexError::SessionExpired`] when a refresh was attempted and
    ///   failed; the session is destroyed as a side effect
    pub async fn authorize(&self, entry: &SessionEntry) -> Result<ValidSession> {
        // Fast path: unexpired token, no suspension beyond the read lock
        {
            let tokens = entry.tokens().read().await;
            match tokens.as_ref() {
                None => return Err(MelodexError::Unauthenticated),
                Some(t) if t.access_token.is_empty() => return Err(MelodexError::Unauthenticated),
                Some(t) if !t.is_expired() => {
                    return Ok(ValidSession { access_token: t.access_token.clone() });
                }
                Some(_) => {}
            }
        }

        // Single-flight: one refresh per session at a time. Concurrent
        // callers queue here; refresh tokens are typically single-use
        // upstream, so a second grant attempt would fail a session that is
        // in fact valid.
        let _gate = entry.refresh_gate().lock().await;

        // Re-check under the gate: the caller that held it before us may
        // have already refreshed (reuse its result) or destroyed the
        // session (share its failure).
        let current = {
            let tokens = entry.tokens().read().await;
            match tokens.as_ref() {
                None => return Err(MelodexError::SessionExpired),
                Some(t) if !t.is_expired() => {
                    debug!("refresh already performed by concurrent request");
                    return Ok(ValidSession { access_token: t.access_token.clone() });
                }
                Some(t) => t.clone(),
            }
        };

        match self.oauth.refresh_access_token(&current.refresh_token).await {
            Ok(response) => {
                let renewed = TokenState::from_response(&response, &current.refresh_token);
                let access_token = renewed.access_token.clone();
                entry.replace(renewed).await;
                info!("access token refreshed");
                Ok(ValidSession { access_token })
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed; destroying session");
                entry.destroy().await;
                Err(MelodexError::SessionExpired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for session::guard.
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use melodex_common::auth::client::OAuthClientError;
    use melodex_common::auth::types::{OAuthError, TokenResponse};

    use super::*;

    enum RefreshBehavior {
        Succeed { access_token: &'static str, expires_in: i64 },
        Reject,
    }

    struct MockOAuthClient {
        behavior: RefreshBehavior,
        delay: Option<StdDuration>,
        refresh_calls: AtomicUsize,
    }

    impl MockOAuthClient {
        fn succeeding(access_token: &'static str, expires_in: i64) -> Self {
            Self {
                behavior: RefreshBehavior::Succeed { access_token, expires_in },
                delay: None,
                refresh_calls: AtomicUsize::new(0),
            }
        }

        fn rejecting() -> Self {
            Self {
                behavior: RefreshBehavior::Reject,
                delay: None,
                refresh_calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: StdDuration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.refresh_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OAuthClientTrait for MockOAuthClient {
        async fn exchange_code(
            &self,
            _code: &str,
        ) -> std::result::Result<TokenResponse, OAuthClientError> {
            Err(OAuthClientError::ParseError("exchange not used in guard tests".to_string()))
        }

        async fn refresh_access_token(
            &self,
            _refresh_token: &str,
        ) -> std::result::Result<TokenResponse, OAuthClientError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.behavior {
                RefreshBehavior::Succeed { access_token, expires_in } => Ok(TokenResponse {
                    access_token: (*access_token).to_string(),
                    refresh_token: None,
                    token_type: Some("Bearer".to_string()),
                    expires_in: *expires_in,
                    scope: None,
                }),
                RefreshBehavior::Reject => Err(OAuthClientError::Provider(OAuthError {
                    error: "invalid_grant".to_string(),
                    error_description: Some("Refresh token revoked".to_string()),
                })),
            }
        }
    }

    fn live_entry(expires_in_secs: i64) -> SessionEntry {
        SessionEntry::new(TokenState {
            access_token: "access_a".to_string(),
            refresh_token: "refresh_a".to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        })
    }

    /// Validates the fast path for an unexpired session.
    ///
    /// Assertions:
    /// - Confirms the session's token is returned unchanged.
    /// - Confirms zero refresh calls were made.
    #[tokio::test]
    async fn test_fast_path_no_network() {
        let oauth = Arc::new(MockOAuthClient::succeeding("unused", 3600));
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = live_entry(3600);

        let session = guard.authorize(&entry).await.unwrap();

        assert_eq!(session.access_token, "access_a");
        assert_eq!(oauth.calls(), 0);
    }

    /// Validates the refresh path for an expired session with a valid
    /// refresh token.
    ///
    /// Assertions:
    /// - Confirms exactly one refresh call.
    /// - Confirms the returned and stored token is the renewed one.
    /// - Confirms `expires_at` is strictly later and lands near
    ///   now + 3600s - 60s (margin applied).
    #[tokio::test]
    async fn test_expired_session_refreshes_once() {
        let oauth = Arc::new(MockOAuthClient::succeeding("access_b", 3600));
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = live_entry(-1);
        let old_expiry = entry.snapshot().await.unwrap().expires_at;

        let session = guard.authorize(&entry).await.unwrap();

        assert_eq!(oauth.calls(), 1);
        assert_eq!(session.access_token, "access_b");

        let renewed = entry.snapshot().await.unwrap();
        assert_eq!(renewed.access_token, "access_b");
        assert!(renewed.expires_at > old_expiry);

        let expected = Utc::now() + Duration::seconds(3600 - 60);
        let drift = (renewed.expires_at - expected).num_seconds().abs();
        assert!(drift <= 1, "expires_at drifted {drift}s from expected");

        // Refresh-grant response omitted the refresh token; the stored one
        // must survive the rotation.
        assert_eq!(renewed.refresh_token, "refresh_a");
    }

    /// Validates failure handling for an invalid refresh token.
    ///
    /// Assertions:
    /// - Confirms the first authorize returns `SessionExpired` and empties
    ///   the session.
    /// - Confirms a subsequent authorize returns `Unauthenticated`.
    #[tokio::test]
    async fn test_failed_refresh_destroys_session() {
        let oauth = Arc::new(MockOAuthClient::rejecting());
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = live_entry(-1);

        let first = guard.authorize(&entry).await;
        assert!(matches!(first, Err(MelodexError::SessionExpired)));
        assert!(!entry.is_alive().await);

        let second = guard.authorize(&entry).await;
        assert!(matches!(second, Err(MelodexError::Unauthenticated)));
        assert_eq!(oauth.calls(), 1);
    }

    /// Validates the unauthenticated path for a destroyed session.
    ///
    /// Assertions:
    /// - Confirms `Unauthenticated` with zero refresh calls.
    #[tokio::test]
    async fn test_destroyed_session_is_unauthenticated() {
        let oauth = Arc::new(MockOAuthClient::succeeding("unused", 3600));
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = live_entry(3600);
        entry.destroy().await;

        let result = guard.authorize(&entry).await;

        assert!(matches!(result, Err(MelodexError::Unauthenticated)));
        assert_eq!(oauth.calls(), 0);
    }

    /// Validates the empty-access-token path.
    ///
    /// Assertions:
    /// - Confirms an empty token reads as `Unauthenticated`, not as a
    ///   refresh candidate.
    #[tokio::test]
    async fn test_empty_access_token_is_unauthenticated() {
        let oauth = Arc::new(MockOAuthClient::succeeding("unused", 3600));
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = SessionEntry::new(TokenState {
            access_token: String::new(),
            refresh_token: "refresh_a".to_string(),
            expires_at: Utc::now() + Duration::seconds(3600),
        });

        let result = guard.authorize(&entry).await;

        assert!(matches!(result, Err(MelodexError::Unauthenticated)));
        assert_eq!(oauth.calls(), 0);
    }

    /// Validates single-flight refresh for concurrent expired requests.
    ///
    /// Two requests observe the expired token at the same time. Without
    /// serialization both would spend the refresh token; with it, exactly
    /// one upstream call happens and both callers get the renewed token.
    ///
    /// Assertions:
    /// - Confirms both authorizes succeed with the renewed token.
    /// - Confirms exactly one refresh call was made.
    #[tokio::test]
    async fn test_concurrent_refresh_is_single_flight() {
        let oauth = Arc::new(
            MockOAuthClient::succeeding("access_b", 3600)
                .with_delay(StdDuration::from_millis(50)),
        );
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = live_entry(-1);

        let (first, second) = tokio::join!(guard.authorize(&entry), guard.authorize(&entry));

        assert_eq!(first.unwrap().access_token, "access_b");
        assert_eq!(second.unwrap().access_token, "access_b");
        assert_eq!(oauth.calls(), 1);
    }

    /// Validates that concurrent callers share a failed refresh outcome.
    ///
    /// Assertions:
    /// - Confirms both callers fail (`SessionExpired`).
    /// - Confirms the refresh token was spent exactly once.
    #[tokio::test]
    async fn test_concurrent_refresh_shares_failure() {
        let oauth =
            Arc::new(MockOAuthClient::rejecting().with_delay(StdDuration::from_millis(50)));
        let guard = SessionGuard::new(Arc::clone(&oauth));
        let entry = live_entry(-1);

        let (first, second) = tokio::join!(guard.authorize(&entry), guard.authorize(&entry));

        assert!(matches!(first, Err(MelodexError::SessionExpired)));
        assert!(matches!(second, Err(MelodexError::SessionExpired)));
        assert_eq!(oauth.calls(), 1);
    }
}
