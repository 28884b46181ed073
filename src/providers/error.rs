//! Error types for search providers

use thiserror::Error;

/// Errors that can occur while a provider serves a search
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider settings are missing or unusable.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The request could not be sent or its body could not be read.
    #[error("failed to fetch data: {0}")]
    Fetch(#[source] reqwest::Error),

    /// The upstream service answered outside the 2xx range.
    #[error("bad response: {status}")]
    BadResponse {
        /// HTTP status code returned upstream
        status: u16,
    },

    /// The body did not have the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller cancelled the search.
    #[error("request cancelled")]
    Cancelled,

    /// The search ran past its deadline.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// The datacenter listing failed, aborting the whole search.
    #[error("failed to fetch data: {source}")]
    Datacenters {
        #[source]
        source: Box<ProviderError>,
    },

    /// A provider with the same name is already registered.
    #[error("provider already registered: {0}")]
    AlreadyRegistered(String),
}

impl ProviderError {
    /// Whether the caller gave up, as opposed to the upstream failing
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Cancelled | Self::DeadlineExceeded => true,
            Self::Datacenters { source } => source.is_cancellation(),
            _ => false,
        }
    }

    /// Upstream HTTP status, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadResponse { status } => Some(*status),
            Self::Datacenters { source } => source.status(),
            _ => None,
        }
    }
}
