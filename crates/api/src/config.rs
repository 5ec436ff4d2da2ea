//! Deployment configuration
//!
//! Typed view over the environment. Missing upstream app credentials or a
//! broken redirect URI would otherwise surface as a silently broken login
//! redirect, so validation fails fast at startup with a named field.

use std::time::Duration;

use melodex_common::auth::OAuthConfig;
use melodex_domain::constants::UPSTREAM_TIMEOUT_SECS;
use melodex_domain::{MelodexError, Result};
use url::Url;

const SPOTIFY_AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";
const SPOTIFY_TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";
const OAUTH_SCOPES: [&str; 3] = ["user-read-private", "user-read-email", "user-top-read"];

const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_PORT: u16 = 8888;
const MIN_COOKIE_KEY_BYTES: usize = 32;

/// Application configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upstream app credentials
    pub client_id: String,
    pub client_secret: String,

    /// Redirect URI registered upstream; must include the callback path
    pub redirect_uri: String,

    /// Secret the session cookie is signed with
    pub cookie_key: String,

    /// Origin allowed to send credentialed cross-origin requests
    pub frontend_origin: String,

    /// Cache backing-store address; absent means in-process cache
    pub redis_url: Option<String>,

    /// Listen port
    pub port: u16,

    /// Provider endpoint overrides (tests point these at a mock server)
    pub authorize_endpoint: String,
    pub token_endpoint: String,
    pub api_base_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    /// Returns `Config` naming the offending variable when a required value
    /// is missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup (injectable for tests)
    ///
    /// # Errors
    /// Returns `Config` naming the offending variable when a required value
    /// is missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| MelodexError::Config(format!("{key} is required but not set")))
        };

        let client_id = required("MELODEX_CLIENT_ID")?;
        let client_secret = required("MELODEX_CLIENT_SECRET")?;
        let redirect_uri = required("MELODEX_REDIRECT_URI")?;
        validate_redirect_uri(&redirect_uri)?;

        let cookie_key = required("MELODEX_COOKIE_KEY")?;
        if cookie_key.len() < MIN_COOKIE_KEY_BYTES {
            return Err(MelodexError::Config(format!(
                "MELODEX_COOKIE_KEY must be at least {MIN_COOKIE_KEY_BYTES} bytes"
            )));
        }

        let frontend_origin = lookup("MELODEX_FRONTEND_ORIGIN")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());

        let redis_url = lookup("MELODEX_REDIS_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let port = match lookup("MELODEX_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| MelodexError::Config(format!("MELODEX_PORT is not a port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let authorize_endpoint = lookup("MELODEX_AUTHORIZE_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| SPOTIFY_AUTHORIZE_ENDPOINT.to_string());
        let token_endpoint = lookup("MELODEX_TOKEN_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| SPOTIFY_TOKEN_ENDPOINT.to_string());
        let api_base_url = lookup("MELODEX_API_BASE_URL").filter(|v| !v.trim().is_empty());

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            cookie_key,
            frontend_origin,
            redis_url,
            port,
            authorize_endpoint,
            token_endpoint,
            api_base_url,
        })
    }

    /// OAuth configuration for the upstream provider
    #[must_use]
    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig::new(
            self.client_id.clone(),
            self.client_secret.clone(),
            self.redirect_uri.clone(),
            OAUTH_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            self.authorize_endpoint.clone(),
            self.token_endpoint.clone(),
        )
        .with_timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
    }
}

fn validate_redirect_uri(redirect_uri: &str) -> Result<()> {
    let url = Url::parse(redirect_uri).map_err(|e| {
        MelodexError::Config(format!("MELODEX_REDIRECT_URI is not a valid URL: {e}"))
    })?;

    if url.path() == "/" || url.path().is_empty() {
        return Err(MelodexError::Config(
            "MELODEX_REDIRECT_URI must include the callback path".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for config.
    use std::collections::HashMap;

    use super::*;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MELODEX_CLIENT_ID", "client_id"),
            ("MELODEX_CLIENT_SECRET", "client_secret"),
            ("MELODEX_REDIRECT_URI", "http://localhost:8888/callback"),
            ("MELODEX_COOKIE_KEY", "0123456789abcdef0123456789abcdef"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig> {
        AppConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    /// Validates configuration defaults for a minimal environment.
    ///
    /// Assertions:
    /// - Confirms defaults for frontend origin, port, and provider
    ///   endpoints.
    /// - Confirms the absent cache address maps to `None`.
    #[test]
    fn test_minimal_config_defaults() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.frontend_origin, DEFAULT_FRONTEND_ORIGIN);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.authorize_endpoint, SPOTIFY_AUTHORIZE_ENDPOINT);
        assert_eq!(config.token_endpoint, SPOTIFY_TOKEN_ENDPOINT);
        assert!(config.redis_url.is_none());
    }

    /// Validates fail-fast behavior for missing client credentials.
    ///
    /// Assertions:
    /// - Confirms the error names the missing variable.
    #[test]
    fn test_missing_client_id_fails_fast() {
        let mut vars = base_vars();
        vars.remove("MELODEX_CLIENT_ID");

        match load(&vars) {
            Err(MelodexError::Config(msg)) => assert!(msg.contains("MELODEX_CLIENT_ID")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    /// Validates redirect URI validation.
    ///
    /// Assertions:
    /// - Confirms a non-URL value is rejected.
    /// - Confirms a URL without a callback path is rejected.
    #[test]
    fn test_redirect_uri_validation() {
        let mut vars = base_vars();
        vars.insert("MELODEX_REDIRECT_URI", "not-a-url");
        assert!(matches!(load(&vars), Err(MelodexError::Config(_))));

        vars.insert("MELODEX_REDIRECT_URI", "http://localhost:8888/");
        match load(&vars) {
            Err(MelodexError::Config(msg)) => assert!(msg.contains("callback path")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    /// Validates the cookie signing key length requirement.
    ///
    /// Assertions:
    /// - Confirms a short key is rejected with a `Config` error.
    #[test]
    fn test_short_cookie_key_rejected() {
        let mut vars = base_vars();
        vars.insert("MELODEX_COOKIE_KEY", "too-short");

        match load(&vars) {
            Err(MelodexError::Config(msg)) => assert!(msg.contains("MELODEX_COOKIE_KEY")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    /// Validates whitespace sanitization and scope wiring into the OAuth
    /// configuration.
    ///
    /// Assertions:
    /// - Confirms surrounding whitespace is trimmed from credentials.
    /// - Confirms the OAuth config carries the three provider scopes.
    #[test]
    fn test_oauth_config_wiring() {
        let mut vars = base_vars();
        vars.insert("MELODEX_CLIENT_ID", "  padded_id  ");

        let config = load(&vars).unwrap();
        assert_eq!(config.client_id, "padded_id");

        let oauth = config.oauth_config();
        assert_eq!(oauth.client_id, "padded_id");
        assert_eq!(oauth.scope_string(), "user-read-private user-read-email user-top-read");
        assert_eq!(oauth.timeout, Duration::from_secs(UPSTREAM_TIMEOUT_SECS));
    }

    /// Validates the port parser.
    ///
    /// Assertions:
    /// - Confirms a custom port is honored and garbage is rejected.
    #[test]
    fn test_port_parsing() {
        let mut vars = base_vars();
        vars.insert("MELODEX_PORT", "9000");
        assert_eq!(load(&vars).unwrap().port, 9000);

        vars.insert("MELODEX_PORT", "not-a-port");
        assert!(matches!(load(&vars), Err(MelodexError::Config(_))));
    }
}
