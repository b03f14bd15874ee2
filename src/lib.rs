//! HTTP adapter for weekcal.
//!
//! Exposes the `weekcal-core` event store as a small JSON API consumed by the
//! weekly grid UI. All state lives in the store; handlers only translate
//! requests into store operations and serialize the results.

pub mod config;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::build_router;
pub use state::AppState;
