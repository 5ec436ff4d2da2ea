//! Integration tests for the Spotify client against a mock API
//!
//! Verifies the wire contract: bearer authorization, query parameters, the
//! paged/batch body shapes, and upstream error mapping.

use melodex_core::ports::MusicApi;
use melodex_domain::{MelodexError, TimeRange};
use melodex_infra::SpotifyClient;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Validates the profile fetch happy path.
///
/// # Test Steps
/// 1. Mount `/me` expecting the bearer header
/// 2. Fetch the profile
/// 3. Verify id and display name parse
#[tokio::test]
async fn test_profile_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer token_a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user_1",
            "display_name": "Alice",
            "email": "alice@example.com",
            "images": [{"url": "https://img.example/a.png", "height": 64, "width": 64}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotifyClient::with_base_url(server.uri());
    let profile = client.profile("token_a").await.unwrap();

    assert_eq!(profile.id, "user_1");
    assert_eq!(profile.name_or_id(), "Alice");
}

/// Validates top-listing requests and the paged body shape.
///
/// # Test Steps
/// 1. Mount `/me/top/artists` expecting `limit` and `time_range` parameters
/// 2. Fetch top artists for the long-term window
/// 3. Verify items and genres parse
#[tokio::test]
async fn test_top_artists_query_contract() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/top/artists"))
        .and(query_param("limit", "50"))
        .and(query_param("time_range", "long_term"))
        .and(header("authorization", "Bearer token_a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"id": "a1", "name": "Band One", "genres": ["indie", "rock"]},
                {"id": "a2", "name": "Band Two", "genres": []}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotifyClient::with_base_url(server.uri());
    let artists = client.top_artists("token_a", 50, TimeRange::LongTerm).await.unwrap();

    assert_eq!(artists.len(), 2);
    assert_eq!(artists[0].genres, vec!["indie".to_string(), "rock".to_string()]);
}

/// Validates the audio-features batch with null holes.
///
/// # Test Steps
/// 1. Mount `/audio-features` expecting the comma-joined ids
/// 2. Fetch features for two tracks, one unanalyzed
/// 3. Verify positional `None` holes survive
#[tokio::test]
async fn test_audio_features_nulls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audio-features"))
        .and(query_param("ids", "t1,t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "audio_features": [
                {"id": "t1", "valence": 0.8, "energy": 0.6, "danceability": 0.7},
                null
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotifyClient::with_base_url(server.uri());
    let features = client
        .audio_features("token_a", &["t1".to_string(), "t2".to_string()])
        .await
        .unwrap();

    assert_eq!(features.len(), 2);
    assert!(features[0].is_some());
    assert!(features[1].is_none());
}

/// Validates that an empty id batch short-circuits without a request.
#[tokio::test]
async fn test_audio_features_empty_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audio-features"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = SpotifyClient::with_base_url(server.uri());
    let features = client.audio_features("token_a", &[]).await.unwrap();

    assert!(features.is_empty());
}

/// Validates upstream error mapping for non-2xx responses.
///
/// Assertions:
/// - Confirms a 429 maps to `Upstream` carrying the status.
#[tokio::test]
async fn test_non_success_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = SpotifyClient::with_base_url(server.uri());
    let result = client.profile("token_a").await;

    match result {
        Err(MelodexError::Upstream(msg)) => assert!(msg.contains("429")),
        other => panic!("expected Upstream error, got {other:?}"),
    }
}
