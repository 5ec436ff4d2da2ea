//! Friends routes
//!
//! The social layer over the repository ports: user search, requests,
//! listings, and pairwise taste comparison. Caller identity is always the
//! provider id resolved from the (cached) profile.

use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::SignedCookieJar;
use melodex_core::analytics::compare_taste;
use melodex_core::ports::{AnalyticsRepository, FriendRepository, UserRepository};
use melodex_domain::{FriendRequest, FriendSummary, MelodexError, TasteComparison};
use serde::Deserialize;

use super::{authorize, caller_profile};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub receiver_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareBody {
    pub target_user_id: String,
}

/// `GET /friends/search?q=` — search users by display name
pub async fn search(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<FriendSummary>>> {
    let session = authorize(&state, &jar).await?;

    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| MelodexError::InvalidInput("query required".to_string()))?;

    let me = caller_profile(&state, &session.access_token).await?;
    let matches = state.users.search_users(query, &me.id).await?;
    Ok(Json(matches))
}

/// `POST /friends/request` — open a pending friend request
pub async fn send_request(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(body): Json<SendRequestBody>,
) -> ApiResult<Json<FriendRequest>> {
    let session = authorize(&state, &jar).await?;
    let me = caller_profile(&state, &session.access_token).await?;

    let request = state.friends.send_request(&me.id, &body.receiver_id).await?;
    Ok(Json(request))
}

/// `GET /friends` — accepted friends of the caller
pub async fn list(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<FriendSummary>>> {
    let session = authorize(&state, &jar).await?;
    let me = caller_profile(&state, &session.access_token).await?;

    let friends = state.friends.friends_of(&me.id).await?;
    Ok(Json(friends))
}

/// `POST /friends/compare` — taste comparison against another user
///
/// Both sides need a persisted analytics snapshot; visiting the dashboard
/// generates one.
pub async fn compare(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(body): Json<CompareBody>,
) -> ApiResult<Json<TasteComparison>> {
    let session = authorize(&state, &jar).await?;
    let me = caller_profile(&state, &session.access_token).await?;

    let mine = state.analytics.latest_snapshot(&me.id).await?;
    let target = state.analytics.latest_snapshot(&body.target_user_id).await?;

    match (mine, target) {
        (Some(mine), Some(target)) => Ok(Json(compare_taste(&mine, &target))),
        _ => Err(MelodexError::NotFound(
            "analytics not generated yet for one or both users".to_string(),
        )
        .into()),
    }
}
