//! Error-to-response mapping
//!
//! Authentication failures stop the pipeline with 401 so the frontend can
//! prompt re-login; upstream failures surface as 500 with their message.
//! Cache failures never reach this layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use melodex_domain::MelodexError;
use tracing::error;

/// Wrapper that turns a domain error into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub MelodexError);

impl From<MelodexError> for ApiError {
    fn from(err: MelodexError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            MelodexError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated".to_string()),
            MelodexError::SessionExpired => (StatusCode::UNAUTHORIZED, "Session expired".to_string()),
            MelodexError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            MelodexError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            MelodexError::Upstream(msg) | MelodexError::Config(msg) | MelodexError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result alias for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
