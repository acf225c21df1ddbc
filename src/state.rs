//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use crate::application::services::ResolverService;
use crate::infrastructure::cache::CacheService;

/// Application state cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResolverService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(resolver: Arc<ResolverService>, cache: Arc<dyn CacheService>) -> Self {
        Self { resolver, cache }
    }
}
