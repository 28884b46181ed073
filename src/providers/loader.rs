//! Provider loader for initializing providers from configuration

use super::consul;
use super::registry::ProviderRegistry;
use crate::config::Settings;
use crate::network::HttpClient;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Register every enabled provider.
    ///
    /// A provider that fails to register is logged and left out, so one bad
    /// provider never prevents the host from starting.
    pub fn load(settings: &Settings, client: &HttpClient) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();

        let consul_settings = &settings.providers.consul;
        if consul_settings.disabled {
            info!("Skipping disabled provider: consul");
        } else if let Err(e) = consul::register(&mut registry, consul_settings, client.clone()) {
            warn!("Failed to load provider consul: {}", e);
        }

        info!("Loaded {} providers", registry.len());
        registry
    }
}
