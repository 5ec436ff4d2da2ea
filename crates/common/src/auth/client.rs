//! OAuth 2.0 HTTP client
//!
//! Talks to the provider's token endpoint for the authorization-code and
//! refresh-token grants. Client credentials go in the HTTP Basic
//! authorization header rather than the form body, which is the more robust
//! of the two placements providers accept.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, OAuthError, TokenResponse};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed (network error or timeout)
    RequestFailed(reqwest::Error),

    /// OAuth server returned an error response
    Provider(OAuthError),

    /// Failed to parse the response body
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::Provider(e) => write!(f, "OAuth error: {e}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// OAuth 2.0 client for a confidential backend application
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// The underlying HTTP client carries the configured upstream timeout,
    /// so a hung token endpoint surfaces as `RequestFailed` rather than a
    /// stalled request.
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, http }
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, OAuthClientError> {
        let response = self
            .http
            .post(&self.config.token_endpoint)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<OAuthError>(&body).unwrap_or(OAuthError {
                error: format!("http_{}", status.as_u16()),
                error_description: if body.is_empty() { None } else { Some(body) },
            });
            warn!(error = %error, "token endpoint rejected request");
            return Err(OAuthClientError::Provider(error));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| OAuthClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    /// Exchange an authorization code for tokens
    ///
    /// Called after the user completes the provider's authorization page and
    /// is redirected back with a `code` query parameter.
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthClientError> {
        debug!("exchanging authorization code for tokens");

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        self.token_request(&params).await
    }

    /// Refresh an access token using a refresh token
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        debug!("refreshing access token");

        let params = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];

        self.token_request(&params).await
    }
}
