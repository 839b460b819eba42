//! Shared application state

use std::sync::Arc;

use tenantkit_shared::{MemoryStore, TenantStore};

use crate::config::Config;
use crate::routing::PathMatcher;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn TenantStore>,
    pub path_matcher: Arc<PathMatcher>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TenantStore>) -> Self {
        let path_matcher = Arc::new(PathMatcher::new(config.router_bypass_prefixes.clone()));
        Self {
            config: Arc::new(config),
            store,
            path_matcher,
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }
}
