//! Dashboard analytics types
//!
//! Aggregated listening analytics served to the frontend and persisted as
//! snapshots. Serialized field names follow the frontend's camelCase
//! contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Genre with its occurrence count across the user's top artists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: u32,
}

/// Condensed track entry for the dashboard's top-tracks strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    pub artist: String,
    pub image: Option<String>,
    pub preview: Option<String>,
}

/// Aggregated dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub top_genres: Vec<GenreCount>,
    pub mood_score: u32,
    pub top_tracks: Vec<TrackSummary>,
    pub generated_at: DateTime<Utc>,
}

/// Persisted analytics snapshot for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub user_id: String,
    pub top_genres: Vec<GenreCount>,
    pub mood_score: u32,
    pub created_at: DateTime<Utc>,
}

/// Receipt returned when a recommendation run is triggered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationTrigger {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}
