//! Friends-layer types
//!
//! The social layer is deliberately small: requests, summaries, and the
//! pairwise taste comparison. Graph persistence lives behind repository
//! ports; these are the shapes that cross them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a friend link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
}

/// Friend request / link between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub requester_id: String,
    pub receiver_id: String,
    pub status: FriendStatus,
    pub created_at: DateTime<Utc>,
}

/// Minimal user entry returned by search and friend listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendSummary {
    pub user_id: String,
    pub display_name: String,
}

/// Pairwise music-taste comparison
///
/// Compatibility weighs genre overlap at 70% and mood similarity at 30%.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteComparison {
    pub compatibility: u32,
    pub common_genres: Vec<String>,
    pub mood_difference: u32,
    pub target_user_mood: u32,
}
