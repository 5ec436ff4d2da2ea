//! OAuth 2.0 types and structures

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Default bound on any single call to the provider's token endpoint
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749). The refresh token is
/// optional: refresh-grant responses typically omit it, in which case the
/// caller keeps using the one it already holds.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    /// Access-token lifetime in seconds, relative to issue time
    pub expires_in: i64,
    pub scope: Option<String>,
}

/// OAuth configuration for the authorization server
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID registered with the provider
    pub client_id: String,

    /// OAuth client secret (confidential backend client)
    pub client_secret: String,

    /// Redirect URI; must exactly match the value registered upstream and
    /// include the callback path
    pub redirect_uri: String,

    /// OAuth scopes to request
    pub scopes: Vec<String>,

    /// Full URL of the provider's authorization page
    pub authorize_endpoint: String,

    /// Full URL of the provider's token endpoint
    pub token_endpoint: String,

    /// Request timeout applied to every token-endpoint call
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Create a new OAuth configuration
    #[must_use]
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        scopes: Vec<String>,
        authorize_endpoint: String,
        token_endpoint: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            scopes,
            authorize_endpoint,
            token_endpoint,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    /// Override the upstream request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get scopes as a space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Build the authorization URL for the browser redirect
    ///
    /// The `state` parameter must be validated when the callback returns.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("response_type", "code".to_string()),
            ("client_id", self.client_id.clone()),
            ("redirect_uri", self.redirect_uri.clone()),
            ("scope", self.scope_string()),
            ("state", state.to_string()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.authorize_endpoint, query_string)
    }
}

/// OAuth error response from the authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
