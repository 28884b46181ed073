//! Settings structures for Ferret-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, as read from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: ProvidersSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject timeouts that cannot be turned into a `Duration`
    pub fn validate(&self) -> Result<()> {
        let timeouts = [
            ("search.default_timeout", self.search.default_timeout),
            ("search.max_timeout", self.search.max_timeout),
            ("outgoing.request_timeout", self.outgoing.request_timeout),
        ];
        for (key, seconds) in timeouts {
            if !seconds.is_finite() || seconds < 0.0 {
                anyhow::bail!(
                    "{} must be a non-negative number of seconds, got {}",
                    key,
                    seconds
                );
            }
        }
        Ok(())
    }

    /// Merge with environment variables (FERRET_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("FERRET_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("FERRET_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("FERRET_CONSUL_URL") {
            self.providers.consul.url = val;
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3030,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Query execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Timeout in seconds when a query does not set one
    pub default_timeout: f64,
    /// Upper bound in seconds for any query timeout
    pub max_timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_timeout: crate::DEFAULT_TIMEOUT as f64,
            max_timeout: crate::MAX_TIMEOUT as f64,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::MAX_TIMEOUT as f64,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Per-provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    pub consul: ConsulSettings,
}

/// Consul provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsulSettings {
    /// Catalog base URL, e.g. `http://consul.local:8500`
    pub url: String,
    /// Whether the provider is disabled
    pub disabled: bool,
}
