//! Analytics routes

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use axum_extra::extract::SignedCookieJar;
use melodex_core::analytics::compute_dashboard;
use melodex_core::ports::{AnalyticsRepository, MusicApi, RecommendationEngine};
use melodex_core::{fetch_with_cache, ResourceTag};
use melodex_domain::{AnalyticsSnapshot, DashboardAnalytics, RecommendationTrigger};
use tracing::{error, warn};

use super::{authorize, caller_profile};
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/analytics/dashboard` — aggregated listening analytics
///
/// Read-through cached under the `dashboard` tag. On a miss the aggregation
/// runs against the provider and a snapshot is persisted; snapshot failures
/// are logged, never propagated.
pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<DashboardAnalytics>> {
    let session = authorize(&state, &jar).await?;
    let access_token = session.access_token;

    let music = Arc::clone(&state.music);
    let analytics_repo = Arc::clone(&state.analytics);
    let token = access_token.clone();

    let dashboard = fetch_with_cache(
        state.cache.as_ref(),
        ResourceTag::Dashboard,
        &access_token,
        ResourceTag::Dashboard.ttl(),
        move || async move {
            let dashboard = compute_dashboard(music.as_ref(), &token).await?;

            match music.profile(&token).await {
                Ok(profile) => {
                    let snapshot = AnalyticsSnapshot {
                        user_id: profile.id,
                        top_genres: dashboard.top_genres.clone(),
                        mood_score: dashboard.mood_score,
                        created_at: dashboard.generated_at,
                    };
                    if let Err(e) = analytics_repo.save_snapshot(snapshot).await {
                        error!(error = %e, "failed to persist analytics snapshot");
                    }
                }
                Err(e) => warn!(error = %e, "skipping analytics snapshot; profile unavailable"),
            }

            Ok(dashboard)
        },
    )
    .await?;

    Ok(Json(dashboard))
}

/// `POST /api/recommend/generate` — trigger a recommendation run
pub async fn generate_recommendations(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<RecommendationTrigger>> {
    let session = authorize(&state, &jar).await?;
    let profile = caller_profile(&state, &session.access_token).await?;

    let receipt = state.recommendations.trigger(&profile.id).await?;
    Ok(Json(receipt))
}
