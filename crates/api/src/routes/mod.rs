//! HTTP routing
//!
//! Thin handlers over the core: resolve the session, authorize (which may
//! refresh), delegate to a cache-coordinated fetch or a repository, map the
//! outcome. The guard runs inside each protected handler immediately before
//! the upstream work, not as entry middleware.

pub mod analytics;
pub mod auth;
pub mod friends;
pub mod user;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::SignedCookieJar;
use melodex_core::ports::MusicApi;
use melodex_core::session::{SessionEntry, ValidSession};
use melodex_core::{fetch_with_cache, ResourceTag};
use melodex_domain::constants::SESSION_COOKIE_NAME;
use melodex_domain::{MelodexError, UserProfile};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let origin = state
        .config
        .frontend_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173"));

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        // Auth
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
        .route("/auth/login", get(auth::login_alias))
        .route("/auth/logout", get(auth::logout_alias))
        .route("/auth/me", get(auth::me_alias))
        // User & analytics
        .route("/api/user/profile", get(user::profile))
        .route("/api/analytics/dashboard", get(analytics::dashboard))
        .route("/api/recommend/generate", post(analytics::generate_recommendations))
        // Friends
        .route("/friends/search", get(friends::search))
        .route("/friends/request", post(friends::send_request))
        .route("/friends", get(friends::list))
        .route("/friends/compare", post(friends::compare))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "service": "melodex-api", "status": "ok" }))
}

/// Resolve the caller's session entry from the signed cookie
pub(crate) fn session_entry(state: &AppState, jar: &SignedCookieJar) -> Option<Arc<SessionEntry>> {
    let id = jar.get(SESSION_COOKIE_NAME)?.value().to_string();
    state.sessions.get(&id)
}

/// Authorize the caller, refreshing the access token if needed
pub(crate) async fn authorize(state: &AppState, jar: &SignedCookieJar) -> ApiResult<ValidSession> {
    let entry = session_entry(state, jar).ok_or(ApiError(MelodexError::Unauthenticated))?;
    Ok(state.guard.authorize(&entry).await?)
}

/// Caller's profile, read through the profile cache
pub(crate) async fn caller_profile(
    state: &AppState,
    access_token: &str,
) -> ApiResult<UserProfile> {
    let music = Arc::clone(&state.music);
    let token = access_token.to_string();

    let profile = fetch_with_cache(
        state.cache.as_ref(),
        ResourceTag::Profile,
        access_token,
        ResourceTag::Profile.ttl(),
        move || async move { music.profile(&token).await },
    )
    .await?;

    Ok(profile)
}
