//! Traits for OAuth operations
//!
//! Abstracts the token-endpoint client so session logic can be tested with
//! mock implementations and no live network.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::TokenResponse;

/// Trait for OAuth client operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Exchange an authorization code for tokens
    ///
    /// # Arguments
    /// * `code` - Authorization code from the redirect callback
    ///
    /// # Errors
    /// Returns error if the exchange fails or the response cannot be parsed
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthClientError>;

    /// Refresh an access token using a refresh token
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh token from a previous authorization
    ///
    /// # Errors
    /// Returns error if the provider rejects the refresh token, the request
    /// fails or times out, or the response body is malformed
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, OAuthClientError>;
}
