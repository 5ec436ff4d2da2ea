//! Melodex backend entrypoint

use melodex_api::{router, AppConfig, AppState};
use melodex_domain::{MelodexError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(_) => info!("no .env file found; using process environment"),
    }

    // Missing client id or redirect URI must fail here with a clear
    // diagnostic, not later as a broken login redirect.
    let config = AppConfig::from_env()?;
    info!(
        redirect_uri = %config.redirect_uri,
        frontend_origin = %config.frontend_origin,
        shared_cache = config.redis_url.is_some(),
        "configuration loaded"
    );

    let port = config.port;
    let state = AppState::new(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| MelodexError::Internal(format!("failed to bind port {port}: {e}")))?;
    info!(port, "server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| MelodexError::Internal(format!("server error: {e}")))
}
