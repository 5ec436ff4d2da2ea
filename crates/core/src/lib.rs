//! # Melodex Core
//!
//! Business logic for the Melodex backend. This crate owns the pieces with
//! real design content:
//!
//! - [`session`]: the session-bound token lifecycle. Server-side sessions,
//!   the guard that re-validates (and transparently refreshes) credentials
//!   before every upstream call, and single-flight serialization of refresh
//!   per session.
//! - [`cache`]: read-through cache coordination. The fail-open `CacheStore`
//!   port, token-discriminated cache keys per resource tag, and explicit
//!   invalidation on logout.
//! - [`analytics`]: dashboard aggregation over the streaming provider's
//!   listings and the pairwise taste comparison.
//! - [`ports`]: trait boundaries for external collaborators (streaming API,
//!   user/friend/analytics persistence, recommendation engine).
//!
//! Infrastructure adapters live in `melodex-infra`; HTTP routing lives in
//! `melodex-api`.

pub mod analytics;
pub mod cache;
pub mod ports;
pub mod session;

pub use cache::{fetch_with_cache, invalidate_session_entries, CacheStore, ResourceTag};
pub use session::{SessionEntry, SessionGuard, SessionStore, TokenState, ValidSession};
