//! Upstream catalog types
//!
//! Minimal projections of the streaming provider's artist, track, and
//! audio-feature payloads. Only the fields the aggregation consumes are
//! modeled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Artist entry from the top-artists listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Track entry from the top-tracks listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    pub album: Album,
    pub preview_url: Option<String>,
}

impl Track {
    /// Primary artist name, empty string when the provider omits artists
    #[must_use]
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map_or("", |a| a.name.as_str())
    }
}

/// Artist reference embedded in a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

/// Album reference embedded in a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
}

/// Per-track audio features used for mood scoring
///
/// The provider returns `null` entries for tracks it has no analysis for, so
/// feature listings are consumed as `Vec<Option<AudioFeatures>>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
}

/// Time window for top-item listings, as defined by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    /// Wire value expected by the provider's `time_range` query parameter
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::MediumTerm => "medium_term",
            Self::LongTerm => "long_term",
        }
    }
}
