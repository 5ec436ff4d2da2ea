//! # Melodex Infra
//!
//! Infrastructure adapters behind the core ports:
//!
//! - [`cache`]: `CacheStore` implementations — Redis for multi-instance
//!   deployments behind a load balancer, in-process memory for
//!   single-instance and test runs. Both are fail-open.
//! - [`spotify`]: the streaming provider's Web API client implementing
//!   `MusicApi` over reqwest with a bounded timeout.
//! - [`repositories`]: in-memory user/friend/analytics persistence and the
//!   recommendation trigger. The relational backing store is an external
//!   collaborator; these adapters satisfy the ports for single-instance
//!   deployments and tests.

pub mod cache;
pub mod repositories;
pub mod spotify;

pub use cache::{MemoryCacheStore, RedisCacheStore};
pub use spotify::SpotifyClient;
