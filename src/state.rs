use std::sync::Arc;

use tokio::sync::RwLock;
use weekcal_core::{ConflictPolicy, EventStore};

use crate::config::ServerConfig;

/// Shared application state
///
/// The store is only reachable through the lock. Handlers take the write
/// lock for the whole of a mutation so concurrent requests never lose an
/// update or see a half-applied one.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<EventStore>>,
    pub default_timezone: String,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_policy(config.conflict_policy, &config.default_timezone)
    }

    pub fn with_policy(policy: ConflictPolicy, default_timezone: &str) -> Self {
        AppState {
            store: Arc::new(RwLock::new(EventStore::with_policy(policy))),
            default_timezone: default_timezone.to_string(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}
