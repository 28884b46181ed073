//! Provider traits and types

use super::error::ProviderError;
use crate::results::Results;
use crate::search::{Cancellation, SearchRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Static identity of a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Unique name used for dispatch
    pub name: String,
    /// Display title
    pub title: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}

/// HTTP response read from an upstream service
#[derive(Debug)]
pub struct ProviderResponse {
    /// Response body as text
    pub text: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_str(&self.text).map_err(ProviderError::Decode)
    }
}

/// Main trait that all search providers implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name and title
    fn info(&self) -> ProviderInfo;

    /// Search for `request.keyword`, returning the requested page.
    ///
    /// Every upstream call observes `cancel`.
    async fn search(
        &self,
        request: &SearchRequest,
        cancel: &Cancellation,
    ) -> Result<Results, ProviderError>;
}
