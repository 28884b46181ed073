//! Application state shared across handlers

use crate::config::Settings;
use crate::providers::ProviderRegistry;
use crate::search::Search;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Provider registry
    pub registry: Arc<ProviderRegistry>,
    /// Search executor
    pub search: Arc<Search>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: &Settings, registry: ProviderRegistry) -> anyhow::Result<Self> {
        let registry = Arc::new(registry);
        let search = Search::new(registry.clone())
            .with_timeout(Duration::try_from_secs_f64(settings.search.default_timeout)?)
            .with_max_timeout(Duration::try_from_secs_f64(settings.search.max_timeout)?);

        Ok(Self {
            registry,
            search: Arc::new(search),
        })
    }
}
