//! Port interfaces for external collaborators
//!
//! These traits define the boundaries between core business logic and
//! infrastructure implementations. The relational schema behind the
//! repository ports and the recommendation engine's internals are
//! deliberately opaque to this crate.

use async_trait::async_trait;
use melodex_domain::{
    AnalyticsSnapshot, Artist, AudioFeatures, FriendRequest, FriendSummary, RecommendationTrigger,
    Result, TimeRange, Track, UserProfile,
};

/// Trait for the upstream streaming provider's Web API
///
/// Every method takes the bearer token explicitly; callers obtain it from
/// the session guard immediately beforehand.
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Get the authenticated user's profile
    async fn profile(&self, access_token: &str) -> Result<UserProfile>;

    /// Get the user's top artists for a time range
    async fn top_artists(
        &self,
        access_token: &str,
        limit: usize,
        range: TimeRange,
    ) -> Result<Vec<Artist>>;

    /// Get the user's top tracks for a time range
    async fn top_tracks(
        &self,
        access_token: &str,
        limit: usize,
        range: TimeRange,
    ) -> Result<Vec<Track>>;

    /// Get audio features for a batch of track ids
    ///
    /// The provider answers `null` for tracks it has no analysis for, so
    /// the result is positional with `None` holes.
    async fn audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>>;
}

/// Trait for user persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or update a user from their provider profile
    ///
    /// The refresh token is stored alongside the user so offline pipeline
    /// jobs can act on their behalf.
    async fn upsert_user(&self, profile: &UserProfile, refresh_token: &str) -> Result<()>;

    /// Search users by display name (partial, case-insensitive match),
    /// excluding the caller
    async fn search_users(&self, query: &str, exclude_id: &str) -> Result<Vec<FriendSummary>>;
}

/// Trait for friend-graph persistence
#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// Create a pending friend request
    ///
    /// # Errors
    /// Returns `InvalidInput` if the reverse request already exists; the
    /// receiver should accept it instead of opening a duplicate edge.
    async fn send_request(&self, requester_id: &str, receiver_id: &str) -> Result<FriendRequest>;

    /// List accepted friends of a user
    async fn friends_of(&self, user_id: &str) -> Result<Vec<FriendSummary>>;
}

/// Trait for analytics snapshot persistence
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Persist an analytics snapshot
    async fn save_snapshot(&self, snapshot: AnalyticsSnapshot) -> Result<()>;

    /// Get the most recent snapshot for a user
    async fn latest_snapshot(&self, user_id: &str) -> Result<Option<AnalyticsSnapshot>>;
}

/// Trait for triggering recommendation generation
#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    /// Kick off a recommendation run for a user
    async fn trigger(&self, user_id: &str) -> Result<RecommendationTrigger>;
}
