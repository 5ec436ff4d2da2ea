//! OAuth 2.0 client infrastructure
//!
//! Implements the two grants the backend needs against the streaming
//! provider's accounts service:
//!
//! - **authorization_code**: exchanges the redirect-callback code for an
//!   access/refresh token pair
//! - **refresh_token**: renews an expired access token without user
//!   interaction
//!
//! Client credentials are sent via the HTTP Basic authorization header on
//! both grants. Endpoints are plain configuration, so tests can point the
//! client at a mock server.
//!
//! # Module Organization
//!
//! - [`types`]: `OAuthConfig`, `TokenResponse`, `OAuthError`
//! - [`client`]: HTTP client for the token endpoint
//! - [`traits`]: `OAuthClientTrait` seam for mocking in session tests

pub mod client;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use client::{OAuthClient, OAuthClientError};
pub use traits::OAuthClientTrait;
pub use types::{OAuthConfig, OAuthError, TokenResponse};
