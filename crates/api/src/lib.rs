//! # Melodex API
//!
//! HTTP surface for the Melodex backend: configuration, application state,
//! routing, and error mapping. The binary entrypoint lives in `main.rs`;
//! everything else is a library so integration tests can build the router
//! against mock adapters.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use routes::router;
pub use state::AppState;
