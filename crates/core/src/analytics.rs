//! Dashboard aggregation and taste comparison
//!
//! Derives the dashboard payload from the provider's top-item listings and
//! compares two users' persisted snapshots. The listings are the essential
//! inputs; audio features are enrichment and degrade to a neutral mood
//! score when unavailable.

use chrono::Utc;
use melodex_domain::constants::{
    DASHBOARD_TRACK_COUNT, NEUTRAL_MOOD_SCORE, TOP_GENRE_COUNT, TOP_ITEMS_LIMIT,
};
use melodex_domain::{
    AnalyticsSnapshot, Artist, AudioFeatures, DashboardAnalytics, GenreCount, Result,
    TasteComparison, TimeRange, Track, TrackSummary,
};
use tracing::warn;

use crate::ports::MusicApi;

/// Compute the aggregated dashboard for the given access token
///
/// Top artists (long term) and top tracks (short term) are fetched in
/// parallel and are both essential: either failing fails the aggregation.
/// The audio-features call is non-essential; on failure the mood score
/// falls back to [`NEUTRAL_MOOD_SCORE`].
///
/// # Errors
/// Returns the upstream error of a failed essential listing.
pub async fn compute_dashboard(
    music: &dyn MusicApi,
    access_token: &str,
) -> Result<DashboardAnalytics> {
    let (artists, tracks) = tokio::join!(
        music.top_artists(access_token, TOP_ITEMS_LIMIT, TimeRange::LongTerm),
        music.top_tracks(access_token, TOP_ITEMS_LIMIT, TimeRange::ShortTerm),
    );
    let artists = artists?;
    let tracks = tracks?;

    let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let mood_score = match music.audio_features(access_token, &track_ids).await {
        Ok(features) => mood_score(&features),
        Err(e) => {
            warn!(error = %e, "audio features unavailable; using neutral mood score");
            NEUTRAL_MOOD_SCORE
        }
    };

    Ok(DashboardAnalytics {
        top_genres: top_genres(&artists),
        mood_score,
        top_tracks: track_summaries(&tracks, DASHBOARD_TRACK_COUNT),
        generated_at: Utc::now(),
    })
}

/// Count genre occurrences across artists and keep the most frequent
///
/// Ties break alphabetically so the listing is deterministic.
#[must_use]
pub fn top_genres(artists: &[Artist]) -> Vec<GenreCount> {
    let mut counts: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
    for artist in artists {
        for genre in &artist.genres {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, count)| GenreCount { genre: genre.to_string(), count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    ranked.truncate(TOP_GENRE_COUNT);
    ranked
}

/// Score the listening mood from track audio features, 0..=100
///
/// Valence carries more weight than energy; tracks without analysis are
/// skipped. An empty or hole-only listing scores neutral.
#[must_use]
pub fn mood_score(features: &[Option<AudioFeatures>]) -> u32 {
    let present: Vec<&AudioFeatures> = features.iter().flatten().collect();
    if present.is_empty() {
        return NEUTRAL_MOOD_SCORE;
    }

    let total: f64 = present.iter().map(|f| f.valence * 0.6 + f.energy * 0.4).sum();
    let mean = total / present.len() as f64;
    (mean * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Condense tracks into the dashboard's top-tracks strip
#[must_use]
pub fn track_summaries(tracks: &[Track], count: usize) -> Vec<TrackSummary> {
    tracks
        .iter()
        .take(count)
        .map(|t| TrackSummary {
            name: t.name.clone(),
            artist: t.primary_artist().to_string(),
            image: t.album.images.first().map(|i| i.url.clone()),
            preview: t.preview_url.clone(),
        })
        .collect()
}

/// Compare two users' snapshots into a compatibility verdict
///
/// Genre overlap is scored against the larger genre list, mood similarity
/// as `100 - |Δmood|`; the overall compatibility weighs them 70/30.
#[must_use]
pub fn compare_taste(mine: &AnalyticsSnapshot, target: &AnalyticsSnapshot) -> TasteComparison {
    let my_genres: Vec<&str> = mine.top_genres.iter().map(|g| g.genre.as_str()).collect();
    let target_genres: Vec<&str> = target.top_genres.iter().map(|g| g.genre.as_str()).collect();

    let common_genres: Vec<String> = my_genres
        .iter()
        .filter(|g| target_genres.contains(g))
        .map(|g| (*g).to_string())
        .collect();

    let largest = my_genres.len().max(target_genres.len());
    let overlap_score = if largest == 0 {
        0.0
    } else {
        common_genres.len() as f64 / largest as f64 * 100.0
    };

    let mood_difference = mine.mood_score.abs_diff(target.mood_score);
    let mood_similarity = 100.0 - f64::from(mood_difference.min(100));

    let compatibility = overlap_score * 0.7 + mood_similarity * 0.3;

    TasteComparison {
        compatibility: compatibility.round() as u32,
        common_genres,
        mood_difference,
        target_user_mood: target.mood_score,
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for analytics aggregation.
    use melodex_domain::{Album, AlbumImage, TrackArtist};

    use super::*;

    fn artist(name: &str, genres: &[&str]) -> Artist {
        Artist {
            id: name.to_lowercase(),
            name: name.to_string(),
            genres: genres.iter().map(|g| (*g).to_string()).collect(),
        }
    }

    fn features(valence: f64, energy: f64) -> Option<AudioFeatures> {
        Some(AudioFeatures { id: "t".to_string(), valence, energy, danceability: 0.5 })
    }

    fn snapshot(user_id: &str, genres: &[&str], mood: u32) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            user_id: user_id.to_string(),
            top_genres: genres
                .iter()
                .map(|g| GenreCount { genre: (*g).to_string(), count: 1 })
                .collect(),
            mood_score: mood,
            created_at: Utc::now(),
        }
    }

    /// Validates `top_genres` ranking for the counting scenario.
    ///
    /// Assertions:
    /// - Confirms genres rank by occurrence count descending.
    /// - Confirms ties break alphabetically.
    /// - Confirms the listing truncates to the configured count.
    #[test]
    fn test_top_genres_ranking() {
        let artists = vec![
            artist("A", &["indie", "rock"]),
            artist("B", &["rock", "pop"]),
            artist("C", &["rock", "indie"]),
            artist("D", &["pop", "jazz", "ambient", "folk"]),
        ];

        let ranked = top_genres(&artists);

        assert_eq!(ranked[0], GenreCount { genre: "rock".to_string(), count: 3 });
        assert_eq!(ranked[1], GenreCount { genre: "indie".to_string(), count: 2 });
        assert_eq!(ranked[2], GenreCount { genre: "pop".to_string(), count: 2 });
        assert_eq!(ranked.len(), TOP_GENRE_COUNT);
    }

    /// Validates `mood_score` behavior across present, missing, and empty
    /// feature sets.
    ///
    /// Assertions:
    /// - Confirms the weighted valence/energy mean scales to 0..=100.
    /// - Confirms `None` holes are skipped.
    /// - Confirms an empty listing scores neutral.
    #[test]
    fn test_mood_score() {
        let upbeat = vec![features(1.0, 1.0), features(1.0, 1.0)];
        assert_eq!(mood_score(&upbeat), 100);

        let mixed = vec![features(0.5, 0.5), None, features(0.5, 0.5)];
        assert_eq!(mood_score(&mixed), 50);

        assert_eq!(mood_score(&[]), NEUTRAL_MOOD_SCORE);
        assert_eq!(mood_score(&[None, None]), NEUTRAL_MOOD_SCORE);
    }

    /// Validates `track_summaries` projection.
    ///
    /// Assertions:
    /// - Confirms the primary artist, first album image, and preview URL
    ///   carry over.
    /// - Confirms the listing truncates to the requested count.
    #[test]
    fn test_track_summaries() {
        let tracks: Vec<Track> = (0..8)
            .map(|i| Track {
                id: format!("t{i}"),
                name: format!("Track {i}"),
                artists: vec![TrackArtist { name: "Artist".to_string() }],
                album: Album { images: vec![AlbumImage { url: format!("img{i}") }] },
                preview_url: Some(format!("preview{i}")),
            })
            .collect();

        let summaries = track_summaries(&tracks, 5);

        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].name, "Track 0");
        assert_eq!(summaries[0].artist, "Artist");
        assert_eq!(summaries[0].image.as_deref(), Some("img0"));
        assert_eq!(summaries[0].preview.as_deref(), Some("preview0"));
    }

    /// Validates `compare_taste` scoring for the partial-overlap scenario.
    ///
    /// Assertions:
    /// - Confirms the common-genre listing.
    /// - Confirms the 70/30 weighting of overlap and mood similarity.
    #[test]
    fn test_compare_taste() {
        let mine = snapshot("u1", &["rock", "indie", "pop"], 70);
        let target = snapshot("u2", &["rock", "jazz", "pop"], 50);

        let comparison = compare_taste(&mine, &target);

        assert_eq!(comparison.common_genres, vec!["rock".to_string(), "pop".to_string()]);
        assert_eq!(comparison.mood_difference, 20);
        assert_eq!(comparison.target_user_mood, 50);
        // overlap = 2/3 * 100, mood similarity = 80
        let expected = (2.0 / 3.0 * 100.0 * 0.7 + 80.0 * 0.3_f64).round() as u32;
        assert_eq!(comparison.compatibility, expected);
    }

    /// Validates `compare_taste` behavior for users with no recorded genres.
    ///
    /// Assertions:
    /// - Confirms a zero overlap score rather than a division error.
    #[test]
    fn test_compare_taste_empty_genres() {
        let mine = snapshot("u1", &[], 50);
        let target = snapshot("u2", &[], 50);

        let comparison = compare_taste(&mine, &target);

        assert!(comparison.common_genres.is_empty());
        assert_eq!(comparison.compatibility, 30); // mood similarity share only
    }
}
