//! Provider registry for managing available search providers

use super::error::ProviderError;
use super::traits::{Provider, ProviderInfo};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available search providers
pub struct ProviderRegistry {
    /// Providers by name
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under its own name.
    ///
    /// Fails if the name is taken; the existing provider is kept.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> Result<(), ProviderError> {
        let name = provider.info().name;
        if self.providers.contains_key(&name) {
            return Err(ProviderError::AlreadyRegistered(name));
        }
        self.providers.insert(name, provider);
        Ok(())
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(name)
    }

    /// Identity of every provider, sorted by name
    pub fn infos(&self) -> Vec<ProviderInfo> {
        let mut infos: Vec<ProviderInfo> = self.providers.values().map(|p| p.info()).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Check if a provider exists
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
