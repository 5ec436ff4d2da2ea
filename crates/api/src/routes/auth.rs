//! Auth routes: login redirect, OAuth callback, logout

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use melodex_common::auth::OAuthClientTrait;
use melodex_core::invalidate_session_entries;
use melodex_core::ports::{MusicApi, UserRepository};
use melodex_core::session::TokenState;
use melodex_domain::constants::{
    SESSION_COOKIE_MAX_AGE_HOURS, SESSION_COOKIE_NAME, STATE_COOKIE_NAME,
};
use melodex_domain::MelodexError;
use rand::RngCore;
use serde::Deserialize;
use tracing::{info, warn};

use super::session_entry;
use crate::error::ApiResult;
use crate::state::AppState;

const STATE_COOKIE_MAX_AGE_MINUTES: i64 = 10;

/// Query parameters delivered to the OAuth callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// `GET /login` — redirect the browser to the provider's authorization page
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    let csrf_state = generate_state();
    let url = state.oauth.config().authorize_url(&csrf_state);

    let cookie = Cookie::build((STATE_COOKIE_NAME, csrf_state))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::minutes(STATE_COOKIE_MAX_AGE_MINUTES))
        .build();

    (jar.add(cookie), Redirect::temporary(&url))
}

/// `GET /callback` — exchange the authorization code and open a session
pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Some(error) = params.error {
        warn!(error = %error, "provider denied authorization");
        return Err(MelodexError::Upstream(format!("provider returned: {error}")).into());
    }

    let code = params
        .code
        .ok_or_else(|| MelodexError::InvalidInput("missing authorization code".to_string()))?;

    let expected_state = jar
        .get(STATE_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .ok_or_else(|| MelodexError::InvalidInput("missing login state".to_string()))?;
    if params.state.as_deref() != Some(expected_state.as_str()) {
        return Err(MelodexError::InvalidInput("login state mismatch".to_string()).into());
    }
    let jar = jar.remove(Cookie::build((STATE_COOKIE_NAME, "")).path("/").build());

    let tokens = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(|e| MelodexError::Upstream(e.to_string()))?;
    let refresh_token = tokens.refresh_token.clone().ok_or_else(|| {
        MelodexError::Upstream("provider omitted the refresh token".to_string())
    })?;

    let profile = state.music.profile(&tokens.access_token).await?;
    state.users.upsert_user(&profile, &refresh_token).await?;

    let session_id = state.sessions.create(TokenState::from_response(&tokens, &refresh_token));
    info!(user_id = %profile.id, "login completed");

    let cookie = Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(SESSION_COOKIE_MAX_AGE_HOURS))
        .build();

    let target = format!("{}/dashboard?login=success", state.config.frontend_origin);
    Ok((jar.add(cookie), Redirect::temporary(&target)))
}

/// `GET /logout` — invalidate cached entries, destroy the session
///
/// No failure mode is visible to the caller; cache deletes are fail-open
/// and the session is destroyed unconditionally.
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        let session_id = cookie.value().to_string();

        if let Some(entry) = session_entry(&state, &jar) {
            if let Some(tokens) = entry.snapshot().await {
                invalidate_session_entries(state.cache.as_ref(), &tokens.access_token).await;
            }
        }

        state.sessions.remove(&session_id).await;
        info!("logout completed");
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build());
    (jar, Redirect::temporary("/"))
}

/// `GET /auth/login` — alias kept for the frontend's older call sites
pub async fn login_alias() -> Redirect {
    Redirect::temporary("/login")
}

/// `GET /auth/logout`
pub async fn logout_alias() -> Redirect {
    Redirect::temporary("/logout")
}

/// `GET /auth/me` — authorized alias for the profile endpoint
pub async fn me_alias(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Redirect> {
    super::authorize(&state, &jar).await?;
    Ok(Redirect::temporary("/api/user/profile"))
}

fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
