//! User routes

use axum::extract::State;
use axum::Json;
use axum_extra::extract::SignedCookieJar;
use melodex_domain::UserProfile;

use super::{authorize, caller_profile};
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/user/profile` — the caller's provider profile
///
/// Read-through cached under the `profile` tag for its freshness window.
pub async fn profile(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<UserProfile>> {
    let session = authorize(&state, &jar).await?;
    let profile = caller_profile(&state, &session.access_token).await?;
    Ok(Json(profile))
}
