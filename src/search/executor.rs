//! Search execution against registered providers

use super::cancellation::Cancellation;
use super::models::Query;
use crate::providers::{ProviderError, ProviderRegistry};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced to the host for a single query
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SearchError {
    /// HTTP status the host reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownProvider(_) => 404,
            Self::Provider(e) if e.is_cancellation() => 504,
            Self::Provider(e) => e.status().unwrap_or(502),
        }
    }
}

/// Search executor that dispatches queries to providers
pub struct Search {
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Default timeout
    default_timeout: Duration,
    /// Maximum timeout
    max_timeout: Duration,
}

impl Search {
    /// Create a new search executor
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            default_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            max_timeout: Duration::from_secs(crate::MAX_TIMEOUT),
        }
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set maximum timeout
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    /// Execute `query` under a token derived from its timeout
    pub async fn execute(&self, query: &mut Query) -> Result<(), SearchError> {
        let timeout = query.effective_timeout(self.default_timeout, self.max_timeout);
        self.execute_with(query, &Cancellation::with_timeout(timeout)).await
    }

    /// Execute `query` under `cancel`.
    ///
    /// Fills in `start`, `elapsed`, `http_status` and `results`. On error the
    /// results are left empty.
    pub async fn execute_with(
        &self,
        query: &mut Query,
        cancel: &Cancellation,
    ) -> Result<(), SearchError> {
        query.start = Some(Utc::now());
        query.results = Default::default();
        let start = Instant::now();

        let provider = match self.registry.get(&query.provider) {
            Some(provider) => provider.clone(),
            None => {
                let err = SearchError::UnknownProvider(query.provider.clone());
                query.http_status = err.status_code();
                return Err(err);
            }
        };

        info!(
            "Executing search '{}' on provider {} (page {})",
            query.keyword, query.provider, query.page
        );

        let outcome = provider.search(&query.request(), cancel).await;
        query.elapsed = start.elapsed();

        match outcome {
            Ok(mut results) => {
                if query.limit > 0 {
                    results.truncate(query.limit);
                }
                debug!(
                    "Provider {} returned {} results in {:?}",
                    query.provider,
                    results.len(),
                    query.elapsed
                );
                query.results = results;
                query.http_status = 200;
                Ok(())
            }
            Err(e) => {
                warn!("Search failed for {}: {}", query.provider, e);
                let err = SearchError::from(e);
                query.http_status = err.status_code();
                Err(err)
            }
        }
    }
}
