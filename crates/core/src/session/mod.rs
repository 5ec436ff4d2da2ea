//! Session-bound token lifecycle
//!
//! One session per authenticated principal, created by the login callback
//! and addressed by an opaque id carried in a signed cookie. The session
//! holds the bearer credentials for upstream calls:
//!
//! - `access_token`: presented on every provider request
//! - `refresh_token`: used solely by the refresh grant, never exposed
//! - `expires_at`: absolute expiry, provider lifetime minus a safety margin
//!
//! [`SessionGuard::authorize`] is the only path that mutates the token state
//! after login: it re-validates immediately before upstream use, refreshes
//! through the provider when expired, and destroys the session when the
//! refresh is rejected. Refreshes are serialized per session; concurrent
//! callers wait on the in-flight attempt and reuse its outcome instead of
//! spending the (single-use) refresh token twice.

mod guard;
mod store;

pub use guard::{SessionGuard, ValidSession};
pub use store::{SessionEntry, SessionStore, TokenState};
