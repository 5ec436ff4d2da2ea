//! Repository adapters
//!
//! In-memory implementations of the persistence ports. The relational
//! store backing the friend graph and analytics history is an external
//! collaborator; these adapters keep the ports honest for single-instance
//! deployments and tests.

mod memory;

pub use memory::{
    InMemoryAnalyticsRepository, InMemoryFriendRepository, InMemoryUserRepository,
    NoopRecommendationEngine,
};
