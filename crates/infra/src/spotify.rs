//! Spotify Web API client
//!
//! Implements the `MusicApi` port over reqwest. Every call carries the
//! session's bearer token and a bounded timeout; any network failure,
//! non-2xx status, or malformed body maps to `Upstream`.

use std::time::Duration;

use async_trait::async_trait;
use melodex_core::ports::MusicApi;
use melodex_domain::constants::UPSTREAM_TIMEOUT_SECS;
use melodex_domain::{
    Artist, AudioFeatures, MelodexError, Result, TimeRange, Track, UserProfile,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Paged listing wrapper used by the top-items endpoints
#[derive(Debug, Deserialize)]
struct Paging<T> {
    items: Vec<T>,
}

/// Batch wrapper for the audio-features endpoint
#[derive(Debug, Deserialize)]
struct AudioFeaturesBatch {
    audio_features: Vec<Option<AudioFeatures>>,
}

/// Streaming provider client
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
}

impl SpotifyClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Create a client against a custom base URL (tests)
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { http, base_url: base_url.into() }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = %path, "upstream request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| MelodexError::Upstream(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MelodexError::Upstream(format!(
                "{path} answered {}",
                status.as_u16()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MelodexError::Upstream(format!("malformed body from {path}: {e}")))
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn profile(&self, access_token: &str) -> Result<UserProfile> {
        self.get_json(access_token, "/me", &[]).await
    }

    async fn top_artists(
        &self,
        access_token: &str,
        limit: usize,
        range: TimeRange,
    ) -> Result<Vec<Artist>> {
        let paging: Paging<Artist> = self
            .get_json(
                access_token,
                "/me/top/artists",
                &[("limit", limit.to_string()), ("time_range", range.as_str().to_string())],
            )
            .await?;
        Ok(paging.items)
    }

    async fn top_tracks(
        &self,
        access_token: &str,
        limit: usize,
        range: TimeRange,
    ) -> Result<Vec<Track>> {
        let paging: Paging<Track> = self
            .get_json(
                access_token,
                "/me/top/tracks",
                &[("limit", limit.to_string()), ("time_range", range.as_str().to_string())],
            )
            .await?;
        Ok(paging.items)
    }

    async fn audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }

        let batch: AudioFeaturesBatch = self
            .get_json(access_token, "/audio-features", &[("ids", track_ids.join(","))])
            .await?;
        Ok(batch.audio_features)
    }
}
