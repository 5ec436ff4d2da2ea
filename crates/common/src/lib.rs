//! # Melodex Common
//!
//! Shared infrastructure for the Melodex backend:
//!
//! - [`auth`]: OAuth 2.0 types and HTTP client (authorization-code and
//!   refresh-token grants against the streaming provider's token endpoint)
//! - [`cache`]: generic thread-safe TTL cache backing the in-process cache
//!   adapter
//! - [`clock`]: clock abstraction for deterministic time-based tests
//!
//! This crate has no dependencies on other Melodex crates.

pub mod auth;
pub mod cache;
pub mod clock;
